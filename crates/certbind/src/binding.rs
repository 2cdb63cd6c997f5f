//! Certificate binding (RFC 8705 `cnf.x5t#S256`)
//!
//! Issuance stamps the client certificate thumbprint and a default validity
//! window into the claims; verification compares the stamped thumbprint with
//! the certificate presented on the current connection.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::trace;

use crate::claims::{Claims, Confirmation};
use crate::clock::Clock;
use crate::slot::Slot;
use crate::{CNF_CLAIM, DEFAULT_TOKEN_LIFETIME_SECONDS, EXP_CLAIM, IAT_CLAIM, Result, TokenError};

/// Prepare claims for issuance with the default one-hour lifetime
///
/// See [`new_claims_with_lifetime`].
///
/// # Errors
/// Returns `ClaimTypeMismatch` if `cnf` is present but not an object
pub fn new_claims(claims: Claims, thumbprint: &str, clock: &dyn Clock) -> Result<Claims> {
    new_claims_with_lifetime(
        claims,
        thumbprint,
        clock,
        Duration::from_secs(DEFAULT_TOKEN_LIFETIME_SECONDS),
    )
}

/// Prepare claims for issuance
///
/// 1. `iat` absent or unreadable: set to the current time.
/// 2. `exp` absent or unreadable: set to `iat + lifetime`, using the `iat`
///    in effect after step 1.
/// 3. `cnf` absent: create it with `x5t#S256 = thumbprint`. `cnf` present
///    without `x5t#S256`: add it. `x5t#S256` already present: keep it, so a
///    token is never rebound to another certificate.
///
/// Every step is idempotent.
///
/// # Errors
/// Returns `ClaimTypeMismatch` if `cnf` is present but not an object; no
/// claims are returned in that case
pub fn new_claims_with_lifetime(
    mut claims: Claims,
    thumbprint: &str,
    clock: &dyn Clock,
    lifetime: Duration,
) -> Result<Claims> {
    add_time_claims(&mut claims, clock, lifetime);
    add_x5t_s256(&mut claims, thumbprint)?;
    Ok(claims)
}

fn add_time_claims(claims: &mut Claims, clock: &dyn Clock, lifetime: Duration) {
    if claims.get_i64(IAT_CLAIM).is_err() {
        claims.set_i64(IAT_CLAIM, clock.now());
    }

    if claims.get_i64(EXP_CLAIM).is_err() {
        // iat is guaranteed readable here
        let iat = claims.get_i64(IAT_CLAIM).unwrap_or_else(|_| clock.now());
        let lifetime = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);
        claims.set_i64(EXP_CLAIM, iat.saturating_add(lifetime));
    }
}

fn add_x5t_s256(claims: &mut Claims, thumbprint: &str) -> Result<()> {
    let slot = claims
        .confirmation_slot_mut()
        .get_or_insert_with(|| Slot::Typed(Confirmation::default()));

    match slot {
        Slot::Typed(cnf) if cnf.has_x5t_s256() => {
            trace!("cnf.x5t#S256 already present, keeping existing binding");
            Ok(())
        }
        Slot::Typed(cnf) => {
            cnf.set_x5t_s256(thumbprint);
            Ok(())
        }
        Slot::Malformed(_) => Err(TokenError::type_mismatch(CNF_CLAIM, "object")),
    }
}

/// `x5t#S256` thumbprint of a DER-encoded X.509 certificate
///
/// Base64url (no padding) of the SHA-256 digest of the DER bytes.
#[must_use]
pub fn certificate_thumbprint(certificate_der: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(certificate_der))
}

/// Check the claims' bound thumbprint against the presented certificate's
///
/// Case-sensitive, full-length comparison performed in constant time.
///
/// # Errors
/// Returns `BindingFailure` if the claims carry no thumbprint or it differs
pub fn verify_binding(claims: &Claims, presented_thumbprint: &str) -> Result<()> {
    let bound = claims.x5t_s256();
    if bound.is_empty() {
        return Err(TokenError::BindingFailure);
    }

    if bool::from(bound.as_bytes().ct_eq(presented_thumbprint.as_bytes())) {
        Ok(())
    } else {
        Err(TokenError::BindingFailure)
    }
}
