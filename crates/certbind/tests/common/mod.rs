//! Common test utilities for integration tests
//!
//! Key pairs for each signing method, a fixed clock and issuer/verifier
//! builders shared by the certificate binding scenarios.

#![allow(dead_code)]

use std::sync::OnceLock;

use certbind::{
    Algorithm, EcPrivateKey, EcPublicKey, FixedClock, IssuerConfig, SigningKey, TokenIssuer,
    TokenVerifier, VerifierConfig, VerifyingKey,
};
use rand::rngs::OsRng;
use rsa::{RsaPrivateKey, RsaPublicKey};

/// Fixed "current time" used across scenarios (2023-11-14T22:13:20Z)
pub const NOW: i64 = 1_700_000_000;

/// Shared HS256 secret
pub const HMAC_SECRET: &[u8] = b"integration-test-hmac-secret-0123456789";

/// Stand-in DER bytes for the two client certificates in the scenarios
pub const CERT_ONE: &[u8] = b"client certificate one";
pub const CERT_TWO: &[u8] = b"client certificate two";

/// Clock frozen at [`NOW`]
pub fn clock() -> FixedClock {
    FixedClock::new(NOW)
}

/// RSA generation is slow; one 2048-bit key serves every test
fn rsa_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 2048).expect("RSA key generation"))
}

/// Fresh key pair for `algorithm`
pub fn key_pair(algorithm: Algorithm) -> (SigningKey, VerifyingKey) {
    match algorithm {
        Algorithm::HS256 => (
            SigningKey::hmac(HMAC_SECRET),
            VerifyingKey::hmac(HMAC_SECRET),
        ),
        Algorithm::RS256 => {
            let private_key = rsa_key().clone();
            let public_key = RsaPublicKey::from(&private_key);
            (SigningKey::rsa(private_key), VerifyingKey::rsa(public_key))
        }
        Algorithm::ES256 => {
            let signing_key = p256::ecdsa::SigningKey::random(&mut OsRng);
            let verifying_key = p256::ecdsa::VerifyingKey::from(&signing_key);
            (
                EcPrivateKey::from_p256(&signing_key).into(),
                EcPublicKey::from_p256(&verifying_key).into(),
            )
        }
    }
}

/// Issuer and verifier sharing one key pair, both with default config
pub fn issuer_and_verifier(algorithm: Algorithm) -> (TokenIssuer, TokenVerifier) {
    let (signing_key, verifying_key) = key_pair(algorithm);
    (
        TokenIssuer::new(algorithm, signing_key, IssuerConfig::default())
            .expect("issuer key matches algorithm"),
        TokenVerifier::new(algorithm, verifying_key, VerifierConfig::default())
            .expect("verifier key matches algorithm"),
    )
}

/// Every supported algorithm
pub const ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::RS256, Algorithm::ES256];
