//! Signing methods and the algorithm registry
//!
//! Three interchangeable strategies implement [`SigningMethod`]. The registry
//! is the closed [`Algorithm`] enum: there is no runtime registration, so an
//! attacker-controlled `alg` header can only ever select one of these three
//! routines, and each routine only accepts its own key kind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::keys::{SigningKey, VerifyingKey};
use crate::{Result, TokenError};

mod es256;
mod hs256;
mod rs256;

pub use es256::Es256;
pub use hs256::Hs256;
pub use rs256::Rs256;

/// A signature algorithm over a signing-input string
///
/// Implementations are stateless and safe to share across threads.
pub trait SigningMethod: Send + Sync + fmt::Debug {
    /// Registry entry this method implements
    fn algorithm(&self) -> Algorithm;

    /// Algorithm name as written in the `alg` header
    fn name(&self) -> &'static str {
        self.algorithm().as_str()
    }

    /// Sign `signing_input`
    ///
    /// # Errors
    /// - `KeyTypeMismatch` / `UnsupportedCurve` if the key does not suit the algorithm
    /// - `InvalidKey` if the key material cannot be decoded
    /// - `SigningFailed` if the crypto backend fails
    fn sign(&self, key: &SigningKey, signing_input: &str) -> Result<Vec<u8>>;

    /// Check `signature` over `signing_input`
    ///
    /// # Errors
    /// - `KeyTypeMismatch` / `UnsupportedCurve` if the key does not suit the algorithm
    /// - `SignatureInvalid` if the signature is malformed or does not verify
    fn verify(&self, key: &VerifyingKey, signing_input: &str, signature: &[u8]) -> Result<()>;
}

/// Supported signature algorithms (RFC 7518 names)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// HMAC with SHA-256
    #[serde(rename = "HS256")]
    HS256,

    /// RSA PKCS#1 v1.5 with SHA-256
    #[serde(rename = "RS256")]
    RS256,

    /// ECDSA on P-256 with SHA-256
    #[serde(rename = "ES256")]
    ES256,
}

impl Algorithm {
    /// Get the algorithm name as specified in RFC 7518
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::RS256 => "RS256",
            Self::ES256 => "ES256",
        }
    }

    /// The signing method implementing this algorithm
    #[must_use]
    pub fn method(self) -> &'static dyn SigningMethod {
        match self {
            Self::HS256 => &Hs256,
            Self::RS256 => &Rs256,
            Self::ES256 => &Es256,
        }
    }

    /// Key kind this algorithm signs with
    #[must_use]
    pub fn signing_key_kind(self) -> &'static str {
        match self {
            Self::HS256 => "HMAC secret",
            Self::RS256 => "RSA private key",
            Self::ES256 => "EC private key",
        }
    }

    /// Key kind this algorithm verifies with
    #[must_use]
    pub fn verifying_key_kind(self) -> &'static str {
        match self {
            Self::HS256 => "HMAC secret",
            Self::RS256 => "RSA public key",
            Self::ES256 => "EC public key",
        }
    }

    /// Check that `key` can sign with this algorithm
    ///
    /// # Errors
    /// Returns `KeyTypeMismatch`, or `UnsupportedCurve` for a non-256-bit EC key
    pub fn ensure_signing_key(self, key: &SigningKey) -> Result<()> {
        match (self, key) {
            (Self::HS256, SigningKey::Hmac(_)) | (Self::RS256, SigningKey::Rsa(_)) => Ok(()),
            (Self::ES256, SigningKey::Ec(ec)) => es256::ensure_p256(ec.curve()),
            _ => Err(TokenError::KeyTypeMismatch {
                expected: self.signing_key_kind(),
                found: key.kind(),
            }),
        }
    }

    /// Check that `key` can verify with this algorithm
    ///
    /// # Errors
    /// Returns `KeyTypeMismatch`, or `UnsupportedCurve` for a non-256-bit EC key
    pub fn ensure_verifying_key(self, key: &VerifyingKey) -> Result<()> {
        match (self, key) {
            (Self::HS256, VerifyingKey::Hmac(_)) | (Self::RS256, VerifyingKey::Rsa(_)) => Ok(()),
            (Self::ES256, VerifyingKey::Ec(ec)) => es256::ensure_p256(ec.curve()),
            _ => Err(TokenError::KeyTypeMismatch {
                expected: self.verifying_key_kind(),
                found: key.kind(),
            }),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = TokenError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "HS256" => Ok(Self::HS256),
            "RS256" => Ok(Self::RS256),
            "ES256" => Ok(Self::ES256),
            other => Err(TokenError::UnsupportedAlgorithm {
                name: other.to_string(),
            }),
        }
    }
}

/// Look up the signing method for an algorithm name
///
/// # Errors
/// Returns `UnsupportedAlgorithm` for any name other than HS256, RS256 or ES256
pub fn parse_method(name: &str) -> Result<&'static dyn SigningMethod> {
    Ok(name.parse::<Algorithm>()?.method())
}
