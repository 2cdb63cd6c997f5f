//! Token issuance

use tracing::debug;

use crate::binding::new_claims_with_lifetime;
use crate::claims::Claims;
use crate::clock::Clock;
use crate::config::IssuerConfig;
use crate::keys::SigningKey;
use crate::method::Algorithm;
use crate::token::Token;
use crate::{EXP_CLAIM, Result};

/// Issues certificate-bound tokens with one algorithm and one signing key
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    algorithm: Algorithm,
    key: SigningKey,
    config: IssuerConfig,
}

impl TokenIssuer {
    /// Create an issuer
    ///
    /// # Errors
    /// Returns `KeyTypeMismatch` (or `UnsupportedCurve`) if `key` cannot sign
    /// with `algorithm`
    pub fn new(algorithm: Algorithm, key: SigningKey, config: IssuerConfig) -> Result<Self> {
        algorithm.ensure_signing_key(&key)?;
        Ok(Self {
            algorithm,
            key,
            config,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    /// Bind `claims` to the client certificate `thumbprint` and sign them
    ///
    /// Missing `iat`/`exp` are filled in from `clock` and the configured
    /// lifetime; an existing `cnf.x5t#S256` is kept.
    ///
    /// # Errors
    /// - `ClaimTypeMismatch` if `cnf` is present but not an object
    /// - signing errors from the configured method
    pub fn issue(&self, claims: Claims, thumbprint: &str, clock: &dyn Clock) -> Result<String> {
        let claims = new_claims_with_lifetime(claims, thumbprint, clock, self.config.token_lifetime)?;
        let token = Token::with_claims(claims, self.algorithm.method());
        let compact = token.sign(&self.key)?;

        debug!(
            algorithm = %self.algorithm,
            exp = token.claims().get_i64(EXP_CLAIM).ok(),
            "Issued certificate-bound token"
        );
        Ok(compact)
    }
}
