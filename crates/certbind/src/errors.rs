//! Error types for token issuance and verification

use thiserror::Error;

/// Uniform message for every authentication failure surfaced to a client
pub const AUTHENTICATION_FAILED: &str = "authentication failed";

/// Token issuance and verification errors
///
/// Variants are detailed for logs and callers inside the service. Responses
/// sent to clients must use [`TokenError::public_message`] so that expired,
/// forged and unbound tokens are indistinguishable from outside.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Key material does not match what the algorithm expects
    #[error("Unexpected key type: expected {expected}, found {found}")]
    KeyTypeMismatch {
        /// Key kind the algorithm requires
        expected: &'static str,
        /// Key kind that was supplied
        found: &'static str,
    },

    /// EC key is on a curve other than the 256-bit curve ES256 requires
    #[error("ES256 requires a 256-bit curve, key uses a {bit_size}-bit curve")]
    UnsupportedCurve {
        /// Curve size of the supplied key
        bit_size: u32,
    },

    /// Key material of the right kind could not be decoded
    #[error("Invalid key material: {reason}")]
    InvalidKey {
        /// Decoder failure detail
        reason: String,
    },

    /// Claim or header value exists but has an incompatible type
    #[error("Claim '{key}' has an unexpected type: expected {expected}")]
    ClaimTypeMismatch {
        /// Claim or header name
        key: String,
        /// Expected representation
        expected: &'static str,
    },

    /// Required claim or header value is absent
    #[error("Claim '{key}' not found")]
    ClaimMissing {
        /// Claim or header name
        key: String,
    },

    /// Cryptographic signature check failed or the signature is malformed
    #[error("Signature verification failed: {reason}")]
    SignatureInvalid {
        /// Failure detail
        reason: String,
    },

    /// Signature generation failed inside the crypto backend
    #[error("Signing failed: {reason}")]
    SigningFailed {
        /// Backend failure detail
        reason: String,
    },

    /// `exp` is at or before the current time
    #[error("Token has expired")]
    TokenExpired,

    /// `iat` is after the current time
    #[error("Token is not yet valid")]
    TokenNotYetValid,

    /// Presented certificate thumbprint is absent from or differs from `cnf.x5t#S256`
    #[error("Certificate binding verification failed")]
    BindingFailure,

    /// Header names an algorithm with no registered implementation
    #[error("Unsupported algorithm: {name}")]
    UnsupportedAlgorithm {
        /// Algorithm name as presented
        name: String,
    },

    /// Verification attempted without a mutually authenticated TLS connection
    #[error("Mutual TLS connection required")]
    MutualTlsRequired,

    /// Compact token string is structurally invalid
    #[error("Malformed token: {reason}")]
    MalformedToken {
        /// Structural problem detail
        reason: String,
    },

    /// Header or claims could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TokenError {
    /// Get error category for metrics and logging
    pub fn category(&self) -> &'static str {
        match self {
            TokenError::KeyTypeMismatch { .. }
            | TokenError::UnsupportedCurve { .. }
            | TokenError::InvalidKey { .. } => "key_type_mismatch",
            TokenError::ClaimTypeMismatch { .. } => "claim_type_mismatch",
            TokenError::ClaimMissing { .. } => "claim_missing",
            TokenError::SignatureInvalid { .. } => "signature_invalid",
            TokenError::SigningFailed { .. } => "signing_failed",
            TokenError::TokenExpired => "token_expired",
            TokenError::TokenNotYetValid => "token_not_yet_valid",
            TokenError::BindingFailure => "binding_failure",
            TokenError::UnsupportedAlgorithm { .. } => "unsupported_algorithm",
            TokenError::MutualTlsRequired => "mutual_tls_required",
            TokenError::MalformedToken { .. } => "malformed_token",
            TokenError::Serialization(_) => "serialization",
        }
    }

    /// Message safe to return to the remote caller
    ///
    /// Always [`AUTHENTICATION_FAILED`], whatever check failed.
    pub fn public_message(&self) -> &'static str {
        AUTHENTICATION_FAILED
    }

    pub(crate) fn missing(key: &str) -> Self {
        TokenError::ClaimMissing {
            key: key.to_string(),
        }
    }

    pub(crate) fn type_mismatch(key: &str, expected: &'static str) -> Self {
        TokenError::ClaimTypeMismatch {
            key: key.to_string(),
            expected,
        }
    }
}
