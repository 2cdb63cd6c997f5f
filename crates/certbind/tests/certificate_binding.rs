//! End-to-end certificate binding tests
//!
//! A token issued over one mutually authenticated connection must only be
//! accepted over a connection presenting the same client certificate.
//! Tests cover:
//! - Issue and verify over the same certificate, for every algorithm
//! - Replay over a different certificate
//! - Thumbprints computed from certificate DER bytes
//! - First-write-wins binding across re-issuance

mod common;

use certbind::{
    Algorithm, Claims, ConnectionInfo, TokenError, certificate_thumbprint, compact,
};
use common::{ALGORITHMS, CERT_ONE, CERT_TWO, NOW, clock, issuer_and_verifier};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_hs256_bound_token_accepted_only_for_its_certificate() {
    // GIVEN: An HS256 token issued for the connection presenting "F1"
    let (issuer, verifier) = issuer_and_verifier(Algorithm::HS256);
    let clock = clock();
    let token = issuer.issue(Claims::new(), "F1", &clock).unwrap();

    // WHEN: It is presented over the same certificate
    let claims = verifier
        .verify(&token, &ConnectionInfo::mutual_tls("F1"), &clock)
        .unwrap();

    // THEN: It verifies and carries the defaulted claims
    assert_eq!(
        claims.to_json().unwrap(),
        json!({"iat": NOW, "exp": NOW + 3600, "cnf": {"x5t#S256": "F1"}})
    );

    // WHEN: It is replayed over a connection presenting "F2"
    let result = verifier.verify(&token, &ConnectionInfo::mutual_tls("F2"), &clock);

    // THEN: Binding fails
    assert!(matches!(result, Err(TokenError::BindingFailure)));
}

#[test]
fn test_every_algorithm_round_trips_and_binds() {
    for algorithm in ALGORITHMS {
        let (issuer, verifier) = issuer_and_verifier(algorithm);
        let clock = clock();
        let claims = Claims::from_json(json!({"sub": "svc-ledger", "scope": "read"})).unwrap();
        let token = issuer.issue(claims, "thumb-A", &clock).unwrap();

        let parsed = compact::parse(&token).unwrap();
        assert_eq!(
            parsed.header().get_string("alg").unwrap(),
            algorithm.as_str()
        );

        let verified = verifier
            .verify(&token, &ConnectionInfo::mutual_tls("thumb-A"), &clock)
            .unwrap_or_else(|e| panic!("{algorithm} token rejected: {e}"));
        assert_eq!(verified.get("sub"), Some(json!("svc-ledger")));
        assert_eq!(verified.x5t_s256(), "thumb-A");

        assert!(
            matches!(
                verifier.verify(&token, &ConnectionInfo::mutual_tls("thumb-B"), &clock),
                Err(TokenError::BindingFailure)
            ),
            "{algorithm} token accepted for another certificate"
        );
    }
}

#[test]
fn test_binding_from_certificate_der() {
    // GIVEN: A token bound to the thumbprint of CERT_ONE
    let (issuer, verifier) = issuer_and_verifier(Algorithm::ES256);
    let clock = clock();
    let token = issuer
        .issue(Claims::new(), &certificate_thumbprint(CERT_ONE), &clock)
        .unwrap();

    // THEN: The connection presenting CERT_ONE is accepted, CERT_TWO is not
    assert!(
        verifier
            .verify(&token, &ConnectionInfo::from_peer_certificate(CERT_ONE), &clock)
            .is_ok()
    );
    assert!(matches!(
        verifier.verify(&token, &ConnectionInfo::from_peer_certificate(CERT_TWO), &clock),
        Err(TokenError::BindingFailure)
    ));
}

#[test]
fn test_reissue_keeps_original_binding() {
    // GIVEN: Claims that already carry a binding to "F1"
    let (issuer, verifier) = issuer_and_verifier(Algorithm::HS256);
    let clock = clock();
    let claims = Claims::from_json(json!({"cnf": {"x5t#S256": "F1"}})).unwrap();

    // WHEN: They are issued over a connection presenting "F2"
    let token = issuer.issue(claims, "F2", &clock).unwrap();

    // THEN: The token stays bound to "F1"
    assert!(
        verifier
            .verify(&token, &ConnectionInfo::mutual_tls("F1"), &clock)
            .is_ok()
    );
    assert!(matches!(
        verifier.verify(&token, &ConnectionInfo::mutual_tls("F2"), &clock),
        Err(TokenError::BindingFailure)
    ));
}

#[test]
fn test_unbound_token_is_rejected() {
    // GIVEN: A token whose cnf carries no usable thumbprint
    let (issuer, verifier) = issuer_and_verifier(Algorithm::HS256);
    let clock = clock();
    let claims = Claims::from_json(json!({"cnf": {"x5t#S256": 42}})).unwrap();
    let token = issuer.issue(claims, "F1", &clock).unwrap();

    // THEN: No certificate can satisfy it
    for thumbprint in ["F1", "", "42"] {
        assert!(matches!(
            verifier.verify(&token, &ConnectionInfo::mutual_tls(thumbprint), &clock),
            Err(TokenError::BindingFailure)
        ));
    }
}

#[test]
fn test_failures_share_one_public_message() {
    let (issuer, verifier) = issuer_and_verifier(Algorithm::HS256);
    let clock = clock();
    let token = issuer.issue(Claims::new(), "F1", &clock).unwrap();

    let errors = [
        verifier
            .verify(&token, &ConnectionInfo::mutual_tls("F2"), &clock)
            .unwrap_err(),
        verifier
            .verify(&token, &ConnectionInfo::without_client_certificate(), &clock)
            .unwrap_err(),
        verifier
            .verify("garbage", &ConnectionInfo::mutual_tls("F1"), &clock)
            .unwrap_err(),
    ];

    for error in errors {
        assert_eq!(error.public_message(), "authentication failed");
    }
}
