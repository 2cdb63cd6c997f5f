//! # certbind - Certificate-Bound Access Tokens
//!
//! Signed, time-bounded tokens bound to a TLS client certificate, in the
//! style of RFC 8705. A token carries the SHA-256 thumbprint of the client
//! certificate it was issued for in its `cnf.x5t#S256` claim; a verifier
//! rejects the token when it is presented over a connection whose peer
//! certificate has a different thumbprint.
//!
//! ## Core Features
//!
//! - **Three signing methods** - HS256, RS256 and ES256 behind one
//!   [`SigningMethod`] trait, selected from a closed registry
//! - **Typed claims** - managed claims (`iat`, `exp`, `cnf`) in typed slots,
//!   unknown claims preserved in an `extra` bag
//! - **Fail-closed time checks** - `exp > now` and `iat <= now` against an
//!   injected [`Clock`]
//! - **Certificate binding** - first-write-wins `cnf.x5t#S256` stamping and
//!   constant-time comparison at verification
//! - **Pinned verification keys** - the header `alg` only selects the checking
//!   routine, never the key type
//!
//! ## Architecture
//!
//! - `errors` - `TokenError` taxonomy
//! - `clock` - time sources
//! - `keys` - signing and verifying key material
//! - `method` - HS256 / RS256 / ES256 implementations and the registry
//! - `header`, `claims` - the token data model
//! - `binding` - issuance-time claim defaulting and certificate binding
//! - `token` - token assembly
//! - `compact` - three-part compact serialization
//! - `issuer`, `verifier` - end-to-end issuance and verification flows
//! - `config` - issuer and verifier configuration
//!
//! ## Example
//!
//! ```rust
//! use certbind::{
//!     Algorithm, Claims, ConnectionInfo, FixedClock, IssuerConfig, SigningKey, TokenIssuer,
//!     TokenVerifier, VerifierConfig, VerifyingKey,
//! };
//!
//! let secret = b"an-hs256-secret-of-reasonable-length".to_vec();
//! let clock = FixedClock::new(1_700_000_000);
//!
//! let issuer = TokenIssuer::new(
//!     Algorithm::HS256,
//!     SigningKey::hmac(secret.clone()),
//!     IssuerConfig::default(),
//! )?;
//! let token = issuer.issue(Claims::new(), "F1", &clock)?;
//!
//! let verifier = TokenVerifier::new(
//!     Algorithm::HS256,
//!     VerifyingKey::hmac(secret),
//!     VerifierConfig::default(),
//! )?;
//! let claims = verifier.verify(&token, &ConnectionInfo::mutual_tls("F1"), &clock)?;
//! assert_eq!(claims.x5t_s256(), "F1");
//! # Ok::<(), certbind::TokenError>(())
//! ```

pub mod binding;
pub mod claims;
pub mod clock;
pub mod compact;
pub mod config;
pub mod errors;
pub mod header;
pub mod issuer;
pub mod keys;
pub mod method;
pub mod slot;
pub mod token;
pub mod verifier;

pub use binding::{
    certificate_thumbprint, new_claims, new_claims_with_lifetime, verify_binding,
};
pub use claims::{Claims, Confirmation};
pub use clock::{Clock, FixedClock, SystemClock};
pub use compact::ParsedToken;
pub use config::{IssuerConfig, VerifierConfig};
pub use errors::*;
pub use header::Header;
pub use issuer::TokenIssuer;
pub use keys::{EcCurve, EcPrivateKey, EcPublicKey, HmacKey, SigningKey, VerifyingKey};
pub use method::{Algorithm, Es256, Hs256, Rs256, SigningMethod, parse_method};
pub use slot::Slot;
pub use token::Token;
pub use verifier::{ConnectionInfo, TokenVerifier};

/// certbind result type
pub type Result<T> = std::result::Result<T, TokenError>;

/// Confirmation claim name (RFC 7800)
pub const CNF_CLAIM: &str = "cnf";

/// Certificate thumbprint member of the confirmation claim (RFC 8705)
pub const X5T_S256: &str = "x5t#S256";

/// Issued-at claim name
pub const IAT_CLAIM: &str = "iat";

/// Expiration claim name
pub const EXP_CLAIM: &str = "exp";

/// Algorithm header name
pub const ALG_HEADER: &str = "alg";

/// Default token lifetime applied when the issuer supplies no `exp` (1 hour)
pub const DEFAULT_TOKEN_LIFETIME_SECONDS: u64 = 3600;

/// Length in bytes of an ES256 `r || s` signature
pub const ES256_SIGNATURE_LEN: usize = 64;
