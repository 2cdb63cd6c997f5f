//! Token header

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::method::Algorithm;
use crate::slot::{Slot, deserialize_present};
use crate::{ALG_HEADER, Result, TokenError};

/// Token header: a typed `alg` slot plus any other header fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    alg: Option<Slot<String>>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Header {
    /// Empty header; `alg` is filled in by [`crate::Token::new`]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a header from a JSON object
    ///
    /// # Errors
    /// Returns `Serialization` if `value` is not a JSON object
    pub fn from_json(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Read a header field as a string
    ///
    /// # Errors
    /// - `ClaimMissing` if the field is absent
    /// - `ClaimTypeMismatch` if the field is not a string
    pub fn get_string(&self, key: &str) -> Result<String> {
        if key == ALG_HEADER {
            return match &self.alg {
                None => Err(TokenError::missing(key)),
                Some(Slot::Typed(alg)) => Ok(alg.clone()),
                Some(Slot::Malformed(_)) => Err(TokenError::type_mismatch(key, "string")),
            };
        }

        match self.extra.get(key) {
            None => Err(TokenError::missing(key)),
            Some(Value::String(value)) => Ok(value.clone()),
            Some(_) => Err(TokenError::type_mismatch(key, "string")),
        }
    }

    /// Resolve the `alg` field through the closed algorithm registry
    ///
    /// # Errors
    /// - `ClaimMissing` / `ClaimTypeMismatch` if `alg` is absent or not a string
    /// - `UnsupportedAlgorithm` if the name is not HS256, RS256 or ES256
    pub fn algorithm(&self) -> Result<Algorithm> {
        self.get_string(ALG_HEADER)?.parse()
    }

    /// Overwrite `alg` with the algorithm's name
    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.alg = Some(Slot::Typed(algorithm.as_str().to_string()));
    }

    /// Store a header field, routing `alg` to its typed slot
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        if key == ALG_HEADER {
            self.alg = Some(Slot::from_value(value));
        } else {
            self.extra.insert(key.to_string(), value);
        }
    }

    /// Read a header field as raw JSON
    pub fn get(&self, key: &str) -> Option<Value> {
        if key == ALG_HEADER {
            self.alg.as_ref().and_then(Slot::to_value)
        } else {
            self.extra.get(key).cloned()
        }
    }
}
