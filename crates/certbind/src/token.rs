//! Token assembly

use crate::claims::Claims;
use crate::compact::{self, ParsedToken};
use crate::header::Header;
use crate::keys::SigningKey;
use crate::method::SigningMethod;
use crate::Result;

/// A header, a claim set and the method that signs them
///
/// Construction always stamps `alg` with the method's name, so the header
/// can never advertise an algorithm other than the one that signs it.
#[derive(Debug, Clone)]
pub struct Token {
    header: Header,
    claims: Claims,
    method: &'static dyn SigningMethod,
    raw: Option<String>,
}

impl Token {
    /// Assemble an unsigned token
    ///
    /// Any `alg` already present in `header` is overwritten; other header
    /// fields are kept.
    #[must_use]
    pub fn new(mut header: Header, claims: Claims, method: &'static dyn SigningMethod) -> Self {
        header.set_algorithm(method.algorithm());
        Self {
            header,
            claims,
            method,
            raw: None,
        }
    }

    /// Token with the default header and the given claims
    #[must_use]
    pub fn with_claims(claims: Claims, method: &'static dyn SigningMethod) -> Self {
        Self::new(Header::new(), claims, method)
    }

    /// Rebuild a token from a parsed compact string
    ///
    /// The method is resolved from the header's `alg`. The signature is not
    /// checked here.
    ///
    /// # Errors
    /// Returns `ClaimMissing`, `ClaimTypeMismatch` or `UnsupportedAlgorithm`
    /// if `alg` does not name a registered algorithm
    pub fn from_parsed(parsed: ParsedToken) -> Result<Self> {
        let method = parsed.header().algorithm()?.method();
        let raw = parsed.raw().to_string();
        let (header, claims, _) = parsed.into_parts();
        Ok(Self {
            header,
            claims,
            method,
            raw: Some(raw),
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn method(&self) -> &'static dyn SigningMethod {
        self.method
    }

    /// Compact string this token was parsed from, if any
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Consume the token, keeping its claims
    pub fn into_claims(self) -> Claims {
        self.claims
    }

    /// `base64url(header) "." base64url(claims)`
    ///
    /// # Errors
    /// Returns `Serialization` if the header or claims cannot be encoded
    pub fn signing_input(&self) -> Result<String> {
        compact::encode_signing_input(&self.header, &self.claims)
    }

    /// Sign and render the token in compact form
    ///
    /// # Errors
    /// Propagates key, serialization and signing errors from the method
    pub fn sign(&self, key: &SigningKey) -> Result<String> {
        compact::sign(&self.header, &self.claims, self.method, key)
    }
}
