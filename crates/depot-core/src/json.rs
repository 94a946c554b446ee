//! JSON helpers used for config files and cache snapshots.

use crate::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};

/// Deserialize a JSON string.
///
/// # Errors
/// Returns an error if the JSON is invalid or does not match `T`.
pub fn from_json<T: DeserializeOwned>(s: &str) -> Result<T> {
    serde_json::from_str(s).map_err(Error::from)
}

/// Deserialize JSON bytes.
///
/// # Errors
/// Returns an error if the JSON is invalid or does not match `T`.
pub fn from_json_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(Error::from)
}

/// Serialize to compact JSON.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Error::from)
}

/// Serialize to pretty-printed JSON.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Error::from)
}
