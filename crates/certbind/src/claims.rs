//! Token claim set
//!
//! `iat`, `exp` and `cnf` live in typed slots; every other claim is kept in
//! an `extra` bag so unrecognized claims survive a parse/serialize cycle.
//! The accessors below are the only sanctioned read path.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clock::Clock;
use crate::slot::{Slot, deserialize_present};
use crate::{CNF_CLAIM, EXP_CLAIM, IAT_CLAIM, Result, TokenError, X5T_S256};

/// Numeric claim as produced by generic JSON deserialization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    /// Native 64-bit integer
    Integer(i64),
    /// Floating-point number
    Float(f64),
}

impl NumericValue {
    /// Normalize to a 64-bit integer, truncating floats toward zero
    #[must_use]
    pub fn as_i64(self) -> i64 {
        match self {
            NumericValue::Integer(value) => value,
            NumericValue::Float(value) => value as i64,
        }
    }
}

/// Confirmation (`cnf`) claim carrying the certificate binding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    #[serde(
        rename = "x5t#S256",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    x5t_s256: Option<Slot<String>>,

    /// Other confirmation members (e.g. `jkt`)
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Confirmation {
    /// Confirmation bound to the given certificate thumbprint
    #[must_use]
    pub fn with_x5t_s256(thumbprint: impl Into<String>) -> Self {
        Self {
            x5t_s256: Some(Slot::Typed(thumbprint.into())),
            extra: Map::new(),
        }
    }

    /// Certificate thumbprint, if present and a string
    pub fn x5t_s256(&self) -> Option<&str> {
        self.x5t_s256
            .as_ref()
            .and_then(Slot::typed)
            .map(String::as_str)
    }

    /// Whether an `x5t#S256` member exists, whatever its type
    pub fn has_x5t_s256(&self) -> bool {
        self.x5t_s256.is_some()
    }

    pub(crate) fn set_x5t_s256(&mut self, thumbprint: &str) {
        self.x5t_s256 = Some(Slot::Typed(thumbprint.to_string()));
    }

    /// Other confirmation members
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// Token claim set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    iat: Option<Slot<NumericValue>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    exp: Option<Slot<NumericValue>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    cnf: Option<Slot<Confirmation>>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Claims {
    /// Empty claim set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a claim set from a JSON object
    ///
    /// # Errors
    /// Returns `Serialization` if `value` is not a JSON object
    pub fn from_json(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Render the claim set as a JSON object
    ///
    /// # Errors
    /// Returns `Serialization` if a claim cannot be represented as JSON
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Read a claim as a 64-bit integer
    ///
    /// Integers are returned as is and floats are truncated toward zero.
    ///
    /// # Errors
    /// - `ClaimMissing` if the claim is absent
    /// - `ClaimTypeMismatch` for any non-numeric representation
    pub fn get_i64(&self, key: &str) -> Result<i64> {
        match key {
            IAT_CLAIM => numeric_slot(key, self.iat.as_ref()),
            EXP_CLAIM => numeric_slot(key, self.exp.as_ref()),
            CNF_CLAIM => match self.cnf {
                Some(_) => Err(TokenError::type_mismatch(key, "integer")),
                None => Err(TokenError::missing(key)),
            },
            _ => match self.extra.get(key) {
                None => Err(TokenError::missing(key)),
                Some(Value::Number(number)) => number
                    .as_i64()
                    .or_else(|| number.as_f64().map(|value| value as i64))
                    .ok_or_else(|| TokenError::type_mismatch(key, "integer")),
                Some(_) => Err(TokenError::type_mismatch(key, "integer")),
            },
        }
    }

    /// Store an integer claim
    pub fn set_i64(&mut self, key: &str, value: i64) {
        match key {
            IAT_CLAIM => self.iat = Some(Slot::Typed(NumericValue::Integer(value))),
            EXP_CLAIM => self.exp = Some(Slot::Typed(NumericValue::Integer(value))),
            _ => self.insert(key, value),
        }
    }

    /// Store an arbitrary claim value, routing managed claims to their slots
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        match key {
            IAT_CLAIM => self.iat = Some(Slot::from_value(value)),
            EXP_CLAIM => self.exp = Some(Slot::from_value(value)),
            CNF_CLAIM => self.cnf = Some(Slot::from_value(value)),
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
    }

    /// Read a claim as raw JSON
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            IAT_CLAIM => self.iat.as_ref().and_then(Slot::to_value),
            EXP_CLAIM => self.exp.as_ref().and_then(Slot::to_value),
            CNF_CLAIM => self.cnf.as_ref().and_then(Slot::to_value),
            _ => self.extra.get(key).cloned(),
        }
    }

    /// Whether the claim is present, whatever its type
    pub fn contains_key(&self, key: &str) -> bool {
        match key {
            IAT_CLAIM => self.iat.is_some(),
            EXP_CLAIM => self.exp.is_some(),
            CNF_CLAIM => self.cnf.is_some(),
            _ => self.extra.contains_key(key),
        }
    }

    /// Remove a claim, returning its raw JSON
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        match key {
            IAT_CLAIM => self.iat.take().and_then(|slot| slot.to_value()),
            EXP_CLAIM => self.exp.take().and_then(|slot| slot.to_value()),
            CNF_CLAIM => self.cnf.take().and_then(|slot| slot.to_value()),
            _ => self.extra.remove(key),
        }
    }

    /// `exp` is present, well-typed and strictly after the current time
    ///
    /// Fails closed: any retrieval error yields `false`.
    pub fn verify_exp(&self, clock: &dyn Clock) -> bool {
        match self.get_i64(EXP_CLAIM) {
            Ok(exp) => exp > clock.now(),
            Err(_) => false,
        }
    }

    /// `iat` is present, well-typed and not after the current time
    ///
    /// Fails closed: any retrieval error yields `false`.
    pub fn verify_iat(&self, clock: &dyn Clock) -> bool {
        match self.get_i64(IAT_CLAIM) {
            Ok(iat) => iat <= clock.now(),
            Err(_) => false,
        }
    }

    /// Bound certificate thumbprint at `cnf.x5t#S256`
    ///
    /// Returns an empty string when `cnf` is absent or not an object, or when
    /// the member is absent or not a string. Callers must treat an empty
    /// result as "not bound".
    pub fn x5t_s256(&self) -> &str {
        self.confirmation()
            .and_then(Confirmation::x5t_s256)
            .unwrap_or_default()
    }

    /// Typed confirmation claim, if present and an object
    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.cnf.as_ref().and_then(Slot::typed)
    }

    /// Unrecognized claims
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub(crate) fn confirmation_slot_mut(&mut self) -> &mut Option<Slot<Confirmation>> {
        &mut self.cnf
    }
}

fn numeric_slot(key: &str, slot: Option<&Slot<NumericValue>>) -> Result<i64> {
    match slot {
        None => Err(TokenError::missing(key)),
        Some(Slot::Typed(value)) => Ok(value.as_i64()),
        Some(Slot::Malformed(_)) => Err(TokenError::type_mismatch(key, "integer")),
    }
}

// Lets callers build claims from `serde_json::json!` maps
impl TryFrom<Value> for Claims {
    type Error = TokenError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_json(value)
    }
}
