//! Compact serialization: `base64url(header).base64url(claims).base64url(signature)`

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::claims::Claims;
use crate::header::Header;
use crate::keys::SigningKey;
use crate::method::SigningMethod;
use crate::{Result, TokenError};

/// Encode the signing input `base64url(header) "." base64url(claims)`
///
/// # Errors
/// Returns `Serialization` if either part cannot be rendered as JSON
pub fn encode_signing_input(header: &Header, claims: &Claims) -> Result<String> {
    let header_json = serde_json::to_vec(header)?;
    let claims_json = serde_json::to_vec(claims)?;
    Ok(format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(claims_json)
    ))
}

/// Produce the full compact token
///
/// The header is encoded as given; callers normally go through
/// [`crate::Token::sign`], which guarantees `alg` matches `method`.
///
/// # Errors
/// Propagates serialization and signing errors
pub fn sign(
    header: &Header,
    claims: &Claims,
    method: &dyn SigningMethod,
    key: &SigningKey,
) -> Result<String> {
    let signing_input = encode_signing_input(header, claims)?;
    let signature = method.sign(key, &signing_input)?;
    trace!(
        algorithm = method.name(),
        signature_len = signature.len(),
        "Signed compact token"
    );
    Ok(format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature)))
}

/// A compact token split into its parts; the signature is not yet checked
#[derive(Debug, Clone)]
pub struct ParsedToken {
    raw: String,
    signing_input_len: usize,
    header: Header,
    claims: Claims,
    signature: Vec<u8>,
}

impl ParsedToken {
    /// The compact string this token was parsed from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Exact bytes the signature covers
    pub fn signing_input(&self) -> &str {
        &self.raw[..self.signing_input_len]
    }

    /// Decoded header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Decoded claims
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Decoded signature bytes
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Take the parts out of the parsed token
    pub fn into_parts(self) -> (Header, Claims, Vec<u8>) {
        (self.header, self.claims, self.signature)
    }
}

/// Split and decode a compact token
///
/// # Errors
/// Returns `MalformedToken` unless the token has exactly three base64url
/// segments whose first two decode to JSON objects
pub fn parse(token: &str) -> Result<ParsedToken> {
    let mut segments = token.split('.');
    let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(malformed("expected three dot-separated segments"));
    };

    let header: Header = decode_json(header_b64, "header")?;
    let claims: Claims = decode_json(claims_b64, "claims")?;
    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|e| malformed(&format!("signature is not base64url: {e}")))?;

    Ok(ParsedToken {
        raw: token.to_string(),
        signing_input_len: header_b64.len() + 1 + claims_b64.len(),
        header,
        claims,
        signature,
    })
}

fn decode_json<T: DeserializeOwned>(segment: &str, part: &str) -> Result<T> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| malformed(&format!("{part} is not base64url: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| malformed(&format!("{part} is not a JSON object: {e}")))
}

fn malformed(reason: &str) -> TokenError {
    TokenError::MalformedToken {
        reason: reason.to_string(),
    }
}
