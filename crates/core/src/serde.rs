//! Serde helper functions for form deserialization.
//!
//! These functions handle the quirks of HTML form submissions where
//! surrounding whitespace is noise and empty strings mean "not provided".

use serde::{Deserialize, Deserializer};

/// Deserialize a string, trimming surrounding whitespace.
pub fn deserialize_trimmed_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s.trim().to_string())
}

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}
