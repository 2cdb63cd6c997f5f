//! HMAC-SHA256

use ring::hmac;
use subtle::ConstantTimeEq;

use super::{Algorithm, SigningMethod};
use crate::keys::{HmacKey, SigningKey, VerifyingKey};
use crate::{Result, TokenError};

/// HS256: HMAC with SHA-256 over a shared secret
#[derive(Debug, Clone, Copy, Default)]
pub struct Hs256;

impl SigningMethod for Hs256 {
    fn algorithm(&self) -> Algorithm {
        Algorithm::HS256
    }

    fn sign(&self, key: &SigningKey, signing_input: &str) -> Result<Vec<u8>> {
        let SigningKey::Hmac(secret) = key else {
            return Err(TokenError::KeyTypeMismatch {
                expected: Algorithm::HS256.signing_key_kind(),
                found: key.kind(),
            });
        };

        Ok(compute_tag(secret, signing_input).as_ref().to_vec())
    }

    fn verify(&self, key: &VerifyingKey, signing_input: &str, signature: &[u8]) -> Result<()> {
        let VerifyingKey::Hmac(secret) = key else {
            return Err(TokenError::KeyTypeMismatch {
                expected: Algorithm::HS256.verifying_key_kind(),
                found: key.kind(),
            });
        };

        let expected = compute_tag(secret, signing_input);

        // Constant time; slices of different length compare unequal
        if bool::from(expected.as_ref().ct_eq(signature)) {
            Ok(())
        } else {
            Err(TokenError::SignatureInvalid {
                reason: "HMAC tag mismatch".to_string(),
            })
        }
    }
}

fn compute_tag(secret: &HmacKey, signing_input: &str) -> hmac::Tag {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    hmac::sign(&key, signing_input.as_bytes())
}
