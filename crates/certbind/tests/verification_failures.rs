//! Verification failure tests
//!
//! Each rejected token must map to the error variant for the check that
//! failed. Tests cover:
//! - Missing mutual TLS
//! - Algorithm confusion (alg swapped, alg: none)
//! - Tampered claims and stripped signatures
//! - Expired and not-yet-valid tokens
//! - Structurally malformed tokens

mod common;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use certbind::{
    Algorithm, Claims, ConnectionInfo, FixedClock, Hs256, IssuerConfig, SigningKey,
    SigningMethod, TokenError, TokenIssuer, TokenVerifier, VerifierConfig, VerifyingKey,
};
use common::{HMAC_SECRET, NOW, clock, issuer_and_verifier, key_pair};
use serde_json::json;

fn bound() -> ConnectionInfo {
    ConnectionInfo::mutual_tls("F1")
}

/// Compact token with the given header and claims, signed by `sign`
fn forge(header: serde_json::Value, claims: serde_json::Value, sign: impl Fn(&str) -> Vec<u8>) -> String {
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    );
    let signature = sign(&signing_input);
    format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature))
}

#[test]
fn test_mutual_tls_required() {
    // GIVEN: A valid token presented without a client certificate
    let (issuer, verifier) = issuer_and_verifier(Algorithm::RS256);
    let clock = clock();
    let token = issuer.issue(Claims::new(), "F1", &clock).unwrap();

    // THEN: Verification stops at the connection check
    let result = verifier.verify(&token, &ConnectionInfo::without_client_certificate(), &clock);
    assert!(matches!(result, Err(TokenError::MutualTlsRequired)));
}

#[test]
fn test_reject_alg_swap_to_hmac_with_public_key_bytes() {
    // GIVEN: An RS256 verifier, and an attacker who signs HS256 using the
    // RSA public key's bytes as the HMAC secret
    //
    // Attack: classic algorithm confusion
    // Defense: the verifier pins RS256 and never derives a key from the header
    let (_, verifying_key) = key_pair(Algorithm::RS256);
    let verifier =
        TokenVerifier::new(Algorithm::RS256, verifying_key, VerifierConfig::default()).unwrap();

    let public_key_bytes = b"-----BEGIN PUBLIC KEY-----".to_vec();
    let forged = forge(
        json!({"alg": "HS256"}),
        json!({"iat": NOW, "exp": NOW + 60, "cnf": {"x5t#S256": "F1"}}),
        |input| {
            Hs256
                .sign(&SigningKey::hmac(public_key_bytes.clone()), input)
                .unwrap()
        },
    );

    // THEN: The header algorithm does not match the pinned one
    let result = verifier.verify(&forged, &bound(), &clock());
    assert!(matches!(result, Err(TokenError::KeyTypeMismatch { .. })));
}

#[test]
fn test_reject_none_and_unknown_algorithms() {
    let (_, verifier) = issuer_and_verifier(Algorithm::HS256);
    let claims = json!({"iat": NOW, "exp": NOW + 60, "cnf": {"x5t#S256": "F1"}});

    for alg in ["none", "HS512", "hs256"] {
        let forged = forge(json!({"alg": alg}), claims.clone(), |_| Vec::new());
        match verifier.verify(&forged, &bound(), &clock()) {
            Err(TokenError::UnsupportedAlgorithm { name }) => assert_eq!(name, alg),
            other => panic!("expected UnsupportedAlgorithm for {alg}, got {other:?}"),
        }
    }

    // Missing or non-string alg never reaches signature checking
    let no_alg = forge(json!({"typ": "JWT"}), claims.clone(), |_| Vec::new());
    assert!(matches!(
        verifier.verify(&no_alg, &bound(), &clock()),
        Err(TokenError::ClaimMissing { .. })
    ));
    let numeric_alg = forge(json!({"alg": 256}), claims, |_| Vec::new());
    assert!(matches!(
        verifier.verify(&numeric_alg, &bound(), &clock()),
        Err(TokenError::ClaimTypeMismatch { .. })
    ));
}

#[test]
fn test_reject_rebound_claims() {
    // GIVEN: A token for "F1" whose claims are rewritten to bind "F2"
    //
    // Attack: token substitution by editing cnf
    // Defense: cnf is covered by the signature
    let (issuer, verifier) = issuer_and_verifier(Algorithm::ES256);
    let clock = clock();
    let token = issuer.issue(Claims::new(), "F1", &clock).unwrap();

    let mut parts = token.split('.');
    let header = parts.next().unwrap();
    let _ = parts.next();
    let signature = parts.next().unwrap();
    let rebound = URL_SAFE_NO_PAD
        .encode(json!({"iat": NOW, "exp": NOW + 3600, "cnf": {"x5t#S256": "F2"}}).to_string());
    let tampered = format!("{header}.{rebound}.{signature}");

    // THEN: The signature no longer verifies
    let result = verifier.verify(&tampered, &ConnectionInfo::mutual_tls("F2"), &clock);
    assert!(matches!(result, Err(TokenError::SignatureInvalid { .. })));
}

#[test]
fn test_reject_stripped_signature() {
    for algorithm in [Algorithm::HS256, Algorithm::ES256] {
        let (issuer, verifier) = issuer_and_verifier(algorithm);
        let clock = clock();
        let token = issuer.issue(Claims::new(), "F1", &clock).unwrap();
        let stripped = format!("{}.", &token[..token.rfind('.').unwrap()]);

        assert!(matches!(
            verifier.verify(&stripped, &bound(), &clock),
            Err(TokenError::SignatureInvalid { .. })
        ));
    }
}

#[test]
fn test_expired_token() {
    // GIVEN: A token with the default one-hour lifetime
    let (issuer, verifier) = issuer_and_verifier(Algorithm::HS256);
    let clock = clock();
    let token = issuer.issue(Claims::new(), "F1", &clock).unwrap();

    // WHEN: The clock reaches exp exactly
    clock.set(NOW + 3600);

    // THEN: The token is expired
    assert!(matches!(
        verifier.verify(&token, &bound(), &clock),
        Err(TokenError::TokenExpired)
    ));

    // One second earlier it is still valid
    clock.set(NOW + 3599);
    assert!(verifier.verify(&token, &bound(), &clock).is_ok());
}

#[test]
fn test_not_yet_valid_token() {
    // GIVEN: A token issued by a clock running ahead of the verifier's
    let (issuer, verifier) = issuer_and_verifier(Algorithm::HS256);
    let issuer_clock = FixedClock::new(NOW + 30);
    let token = issuer.issue(Claims::new(), "F1", &issuer_clock).unwrap();

    // THEN: iat is in the verifier's future
    let verifier_clock = clock();
    assert!(matches!(
        verifier.verify(&token, &bound(), &verifier_clock),
        Err(TokenError::TokenNotYetValid)
    ));

    // iat == now is accepted
    verifier_clock.set(NOW + 30);
    assert!(verifier.verify(&token, &bound(), &verifier_clock).is_ok());
}

#[test]
fn test_mistyped_time_claims_fail_closed() {
    let verifier = TokenVerifier::new(
        Algorithm::HS256,
        VerifyingKey::hmac(HMAC_SECRET),
        VerifierConfig::default(),
    )
    .unwrap();
    let sign = |input: &str| Hs256.sign(&SigningKey::hmac(HMAC_SECRET), input).unwrap();

    let bad_exp = forge(
        json!({"alg": "HS256"}),
        json!({"iat": NOW, "exp": "never", "cnf": {"x5t#S256": "F1"}}),
        sign,
    );
    assert!(matches!(
        verifier.verify(&bad_exp, &bound(), &clock()),
        Err(TokenError::TokenExpired)
    ));

    let no_iat = forge(
        json!({"alg": "HS256"}),
        json!({"exp": NOW + 60, "cnf": {"x5t#S256": "F1"}}),
        sign,
    );
    assert!(matches!(
        verifier.verify(&no_iat, &bound(), &clock()),
        Err(TokenError::TokenNotYetValid)
    ));
}

#[test]
fn test_malformed_tokens() {
    let (_, verifier) = issuer_and_verifier(Algorithm::HS256);
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#);

    let cases = [
        String::new(),
        "only-one-segment".to_string(),
        format!("{header}.e30"),
        format!("{header}.e30.AA.AA"),
        format!("{header}.not_json!.AA"),
        format!("{header}.{}.AA", URL_SAFE_NO_PAD.encode("\"a string\"")),
    ];

    for case in cases {
        assert!(
            matches!(
                verifier.verify(&case, &bound(), &clock()),
                Err(TokenError::MalformedToken { .. })
            ),
            "expected MalformedToken for {case:?}"
        );
    }
}

#[test]
fn test_relaxed_verifier_still_requires_binding() {
    let signing_key = SigningKey::hmac(HMAC_SECRET);
    let issuer = TokenIssuer::new(Algorithm::HS256, signing_key, IssuerConfig::default()).unwrap();
    let verifier = TokenVerifier::new(
        Algorithm::HS256,
        VerifyingKey::hmac(HMAC_SECRET),
        VerifierConfig {
            require_mutual_tls: false,
        },
    )
    .unwrap();
    let clock = clock();
    let token = issuer.issue(Claims::new(), "F1", &clock).unwrap();

    assert!(matches!(
        verifier.verify(&token, &ConnectionInfo::without_client_certificate(), &clock),
        Err(TokenError::BindingFailure)
    ));
}
