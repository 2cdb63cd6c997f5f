//! Issuer and verifier configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_TOKEN_LIFETIME_SECONDS;

/// Token issuance configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerConfig {
    /// Lifetime applied when the claims carry no readable `exp` (default: 1 hour)
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime: Duration,
}

fn default_token_lifetime() -> Duration {
    Duration::from_secs(DEFAULT_TOKEN_LIFETIME_SECONDS)
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            token_lifetime: default_token_lifetime(),
        }
    }
}

/// Token verification configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Reject connections without a mutually authenticated client
    /// certificate (default: true)
    #[serde(default = "default_require_mutual_tls")]
    pub require_mutual_tls: bool,
}

fn default_require_mutual_tls() -> bool {
    true
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            require_mutual_tls: default_require_mutual_tls(),
        }
    }
}
