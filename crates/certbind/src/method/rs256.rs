//! RSASSA-PKCS1-v1_5 with SHA-256

use rsa::Pkcs1v15Sign;
use sha2::{Digest, Sha256};

use super::{Algorithm, SigningMethod};
use crate::keys::{SigningKey, VerifyingKey};
use crate::{Result, TokenError};

/// RS256: RSA PKCS#1 v1.5 signature over the SHA-256 digest of the input
#[derive(Debug, Clone, Copy, Default)]
pub struct Rs256;

impl SigningMethod for Rs256 {
    fn algorithm(&self) -> Algorithm {
        Algorithm::RS256
    }

    fn sign(&self, key: &SigningKey, signing_input: &str) -> Result<Vec<u8>> {
        let SigningKey::Rsa(private_key) = key else {
            return Err(TokenError::KeyTypeMismatch {
                expected: Algorithm::RS256.signing_key_kind(),
                found: key.kind(),
            });
        };

        let digest = Sha256::digest(signing_input.as_bytes());
        private_key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| TokenError::SigningFailed {
                reason: format!("RSA PKCS#1 v1.5 signing failed: {e}"),
            })
    }

    fn verify(&self, key: &VerifyingKey, signing_input: &str, signature: &[u8]) -> Result<()> {
        let VerifyingKey::Rsa(public_key) = key else {
            return Err(TokenError::KeyTypeMismatch {
                expected: Algorithm::RS256.verifying_key_kind(),
                found: key.kind(),
            });
        };

        let digest = Sha256::digest(signing_input.as_bytes());
        public_key
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
            .map_err(|e| TokenError::SignatureInvalid {
                reason: format!("RSA PKCS#1 v1.5 verification failed: {e}"),
            })
    }
}
