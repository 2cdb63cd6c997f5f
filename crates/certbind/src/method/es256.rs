//! ECDSA on P-256 with SHA-256
//!
//! Signatures use the fixed-width JWS form: `r || s`, each a 32-byte
//! big-endian integer, 64 bytes in total.

use p256::FieldBytes;
use p256::ecdsa::{
    Signature as P256Signature, SigningKey as P256SigningKey, VerifyingKey as P256VerifyingKey,
};
use signature::{Signer, Verifier};

use super::{Algorithm, SigningMethod};
use crate::keys::{EcCurve, SigningKey, VerifyingKey};
use crate::{ES256_SIGNATURE_LEN, Result, TokenError};

/// Width of each of `r` and `s`
const COMPONENT_LEN: usize = ES256_SIGNATURE_LEN / 2;

/// ES256: ECDSA over P-256 with SHA-256
#[derive(Debug, Clone, Copy, Default)]
pub struct Es256;

impl SigningMethod for Es256 {
    fn algorithm(&self) -> Algorithm {
        Algorithm::ES256
    }

    fn sign(&self, key: &SigningKey, signing_input: &str) -> Result<Vec<u8>> {
        let SigningKey::Ec(private_key) = key else {
            return Err(TokenError::KeyTypeMismatch {
                expected: Algorithm::ES256.signing_key_kind(),
                found: key.kind(),
            });
        };
        ensure_p256(private_key.curve())?;

        let signing_key =
            P256SigningKey::from_slice(private_key.scalar()).map_err(|e| TokenError::InvalidKey {
                reason: format!("Invalid P-256 private key: {e}"),
            })?;

        // Hashes the input with SHA-256 before signing
        let signature: P256Signature =
            signing_key
                .try_sign(signing_input.as_bytes())
                .map_err(|e| TokenError::SigningFailed {
                    reason: format!("ECDSA signing failed: {e}"),
                })?;

        let (r, s) = signature.split_bytes();
        let mut encoded = Vec::with_capacity(ES256_SIGNATURE_LEN);
        encoded.extend_from_slice(&left_pad(&r, COMPONENT_LEN));
        encoded.extend_from_slice(&left_pad(&s, COMPONENT_LEN));
        Ok(encoded)
    }

    fn verify(&self, key: &VerifyingKey, signing_input: &str, signature: &[u8]) -> Result<()> {
        let VerifyingKey::Ec(public_key) = key else {
            return Err(TokenError::KeyTypeMismatch {
                expected: Algorithm::ES256.verifying_key_kind(),
                found: key.kind(),
            });
        };
        ensure_p256(public_key.curve())?;

        if signature.len() != ES256_SIGNATURE_LEN {
            return Err(TokenError::SignatureInvalid {
                reason: format!(
                    "ES256 signature must be {ES256_SIGNATURE_LEN} bytes, got {}",
                    signature.len()
                ),
            });
        }

        let verifying_key =
            P256VerifyingKey::from_sec1_bytes(public_key.sec1()).map_err(|e| {
                TokenError::InvalidKey {
                    reason: format!("Invalid P-256 public key: {e}"),
                }
            })?;

        let (r, s) = signature.split_at(COMPONENT_LEN);
        let signature = P256Signature::from_scalars(
            FieldBytes::clone_from_slice(r),
            FieldBytes::clone_from_slice(s),
        )
        .map_err(|_| TokenError::SignatureInvalid {
            reason: "ES256 signature scalars out of range".to_string(),
        })?;

        verifying_key
            .verify(signing_input.as_bytes(), &signature)
            .map_err(|_| TokenError::SignatureInvalid {
                reason: "ECDSA verification failed".to_string(),
            })
    }
}

/// Reject EC keys that are not on the 256-bit curve
pub(super) fn ensure_p256(curve: EcCurve) -> Result<()> {
    match curve {
        EcCurve::P256 => Ok(()),
        other => Err(TokenError::UnsupportedCurve {
            bit_size: other.bit_size(),
        }),
    }
}

/// Left-pad a big-endian integer with zero bytes to `len`
///
/// Inputs already at least `len` bytes long are returned unchanged.
fn left_pad(bytes: &[u8], len: usize) -> Vec<u8> {
    let mut padded = vec![0u8; len.saturating_sub(bytes.len())];
    padded.extend_from_slice(bytes);
    padded
}
