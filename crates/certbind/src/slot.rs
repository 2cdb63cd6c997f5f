//! Typed storage for managed header and claim fields
//!
//! Tokens arrive from generic JSON, so a managed field such as `exp` may carry
//! the wrong JSON type. Rejecting the whole token at deserialization time
//! would hide which field was wrong and break fail-closed accessors, so such
//! values are kept as [`Slot::Malformed`] and reported by the accessor.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A managed field: either a well-typed value or the raw JSON it arrived as
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slot<T> {
    /// Value with the expected type
    Typed(T),
    /// Value present with an incompatible JSON type
    Malformed(Value),
}

impl<T> Slot<T> {
    /// Borrow the typed value, if any
    pub fn typed(&self) -> Option<&T> {
        match self {
            Slot::Typed(value) => Some(value),
            Slot::Malformed(_) => None,
        }
    }

    /// Mutably borrow the typed value, if any
    pub fn typed_mut(&mut self) -> Option<&mut T> {
        match self {
            Slot::Typed(value) => Some(value),
            Slot::Malformed(_) => None,
        }
    }
}

impl<T: DeserializeOwned> Slot<T> {
    /// Classify a raw JSON value
    pub fn from_value(value: Value) -> Self {
        match T::deserialize(&value) {
            Ok(typed) => Slot::Typed(typed),
            Err(_) => Slot::Malformed(value),
        }
    }
}

impl<T: Serialize> Slot<T> {
    /// Render the slot back to JSON
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Slot::Typed(value) => serde_json::to_value(value).ok(),
            Slot::Malformed(value) => Some(value.clone()),
        }
    }
}

/// Deserialize a present field into `Some(slot)`, including an explicit `null`
///
/// Plain `Option<T>` would turn `null` into "absent"; a managed field that is
/// present with a `null` value is a type mismatch, not a missing claim.
pub(crate) fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Slot<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Slot::deserialize(deserializer).map(Some)
}
