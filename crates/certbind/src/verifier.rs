//! Token verification against the presenting connection

use tracing::{debug, warn};

use crate::binding::{certificate_thumbprint, verify_binding};
use crate::claims::Claims;
use crate::clock::Clock;
use crate::compact::{self, ParsedToken};
use crate::config::VerifierConfig;
use crate::keys::VerifyingKey;
use crate::method::Algorithm;
use crate::{Result, TokenError};

/// What the transport layer knows about the caller's connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    peer_thumbprint: Option<String>,
}

impl ConnectionInfo {
    /// Mutually authenticated connection whose client certificate has the
    /// given `x5t#S256` thumbprint
    #[must_use]
    pub fn mutual_tls(thumbprint: impl Into<String>) -> Self {
        Self {
            peer_thumbprint: Some(thumbprint.into()),
        }
    }

    /// Mutually authenticated connection, thumbprint computed from the
    /// DER-encoded peer certificate
    #[must_use]
    pub fn from_peer_certificate(certificate_der: &[u8]) -> Self {
        Self::mutual_tls(certificate_thumbprint(certificate_der))
    }

    /// Connection without a client certificate
    #[must_use]
    pub fn without_client_certificate() -> Self {
        Self {
            peer_thumbprint: None,
        }
    }

    /// Thumbprint of the peer certificate, if mutual TLS was established
    pub fn peer_thumbprint(&self) -> Option<&str> {
        self.peer_thumbprint.as_deref()
    }
}

/// Verifies certificate-bound tokens with a pinned algorithm and key
///
/// The token's `alg` header must name the pinned algorithm; it never selects
/// the key.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    algorithm: Algorithm,
    key: VerifyingKey,
    config: VerifierConfig,
}

impl TokenVerifier {
    /// Create a verifier
    ///
    /// # Errors
    /// Returns `KeyTypeMismatch` (or `UnsupportedCurve`) if `key` cannot
    /// verify `algorithm`
    pub fn new(algorithm: Algorithm, key: VerifyingKey, config: VerifierConfig) -> Result<Self> {
        algorithm.ensure_verifying_key(&key)?;
        Ok(Self {
            algorithm,
            key,
            config,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Parse and verify a compact token presented on `connection`
    ///
    /// Returns the token's claims when the signature, validity window and
    /// certificate binding all check out.
    ///
    /// # Errors
    /// The first failing check, in order: `MutualTlsRequired`,
    /// `MalformedToken`, `UnsupportedAlgorithm` / `KeyTypeMismatch`,
    /// `SignatureInvalid`, `TokenExpired`, `TokenNotYetValid`,
    /// `BindingFailure`. Clients should only ever see
    /// [`TokenError::public_message`].
    pub fn verify(
        &self,
        token: &str,
        connection: &ConnectionInfo,
        clock: &dyn Clock,
    ) -> Result<Claims> {
        let result = self
            .require_connection(connection)
            .and_then(|()| compact::parse(token))
            .and_then(|parsed| self.check(&parsed, connection, clock).map(|()| parsed))
            .map(|parsed| parsed.into_parts().1);
        self.log_outcome(result)
    }

    /// Verify an already parsed token presented on `connection`
    ///
    /// # Errors
    /// Same as [`TokenVerifier::verify`], minus `MalformedToken`
    pub fn verify_parsed(
        &self,
        parsed: &ParsedToken,
        connection: &ConnectionInfo,
        clock: &dyn Clock,
    ) -> Result<Claims> {
        let result = self
            .require_connection(connection)
            .and_then(|()| self.check(parsed, connection, clock))
            .map(|()| parsed.claims().clone());
        self.log_outcome(result)
    }

    fn require_connection(&self, connection: &ConnectionInfo) -> Result<()> {
        if self.config.require_mutual_tls && connection.peer_thumbprint().is_none() {
            return Err(TokenError::MutualTlsRequired);
        }
        Ok(())
    }

    fn check(
        &self,
        parsed: &ParsedToken,
        connection: &ConnectionInfo,
        clock: &dyn Clock,
    ) -> Result<()> {
        let algorithm = parsed.header().algorithm()?;
        if algorithm != self.algorithm {
            return Err(TokenError::KeyTypeMismatch {
                expected: self.algorithm.verifying_key_kind(),
                found: algorithm.verifying_key_kind(),
            });
        }

        algorithm
            .method()
            .verify(&self.key, parsed.signing_input(), parsed.signature())?;

        let claims = parsed.claims();
        if !claims.verify_exp(clock) {
            return Err(TokenError::TokenExpired);
        }
        if !claims.verify_iat(clock) {
            return Err(TokenError::TokenNotYetValid);
        }

        // No peer certificate: "" never matches a bound thumbprint
        verify_binding(claims, connection.peer_thumbprint().unwrap_or_default())
    }

    fn log_outcome(&self, result: Result<Claims>) -> Result<Claims> {
        match &result {
            Ok(_) => debug!(algorithm = %self.algorithm, "Token verified"),
            Err(e) => warn!(
                algorithm = %self.algorithm,
                category = e.category(),
                "Token rejected"
            ),
        }
        result
    }
}
