//! Cached Value Module
//!
//! Result of reading a cached payload: parsed JSON when the payload is JSON,
//! otherwise the raw string untouched.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;

// == Cached Value ==
/// A value read back from the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    /// The payload was valid JSON
    Parsed(Value),
    /// The payload was not JSON and is returned verbatim
    Raw(String),
}

impl CachedValue {
    // == Parse ==
    /// Attempts a JSON parse of `raw`, falling back to the raw string.
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => CachedValue::Parsed(value),
            Err(_) => CachedValue::Raw(raw),
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, CachedValue::Raw(_))
    }

    pub fn as_parsed(&self) -> Option<&Value> {
        match self {
            CachedValue::Parsed(value) => Some(value),
            CachedValue::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            CachedValue::Parsed(_) => None,
            CachedValue::Raw(raw) => Some(raw),
        }
    }

    // == Into Value ==
    /// Collapses both cases into JSON; raw strings become JSON strings.
    pub fn into_value(self) -> Value {
        match self {
            CachedValue::Parsed(value) => value,
            CachedValue::Raw(raw) => Value::String(raw),
        }
    }

    // == Into Typed ==
    /// Deserializes the value into `T`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(self.into_value())?)
    }
}
