//! Argument validation for engine operations.
//!
//! One function per argument. `create` runs them in the order key, value,
//! TTL, and the first failure wins; later checks assume the earlier ones
//! passed.

use crate::storage::{StorageError, StorageResult};
use serde_json::{Map, Value};
use std::str::FromStr;
use std::time::Duration;

/// A JSON object, the only shape of value the store accepts.
pub type Object = Map<String, Value>;

/// A time-to-live argument as supplied by the caller, before validation.
///
/// Callers with typed input use the integer conversions; callers holding
/// text or JSON (a CLI flag, a config file) use [`FromStr`] or
/// `From<&Value>` and let validation reject anything that is not a whole,
/// non-negative number of seconds.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Ttl {
    /// No expiry, same as zero seconds
    #[default]
    Never,
    /// A number of seconds, not yet known to be whole or finite
    Seconds(f64),
    /// Input that was not numeric at all
    Malformed(String),
}

impl From<u64> for Ttl {
    fn from(secs: u64) -> Self {
        Ttl::Seconds(secs as f64)
    }
}

impl From<u32> for Ttl {
    fn from(secs: u32) -> Self {
        Ttl::Seconds(f64::from(secs))
    }
}

impl From<i64> for Ttl {
    fn from(secs: i64) -> Self {
        Ttl::Seconds(secs as f64)
    }
}

impl From<i32> for Ttl {
    fn from(secs: i32) -> Self {
        Ttl::Seconds(f64::from(secs))
    }
}

impl From<f64> for Ttl {
    fn from(secs: f64) -> Self {
        Ttl::Seconds(secs)
    }
}

impl From<Duration> for Ttl {
    fn from(ttl: Duration) -> Self {
        Ttl::Seconds(ttl.as_secs_f64())
    }
}

impl From<Option<u64>> for Ttl {
    fn from(secs: Option<u64>) -> Self {
        secs.map(Ttl::from).unwrap_or(Ttl::Never)
    }
}

impl From<&Value> for Ttl {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Ttl::Never,
            Value::Number(n) => n
                .as_f64()
                .map(Ttl::Seconds)
                .unwrap_or_else(|| Ttl::Malformed(n.to_string())),
            other => Ttl::Malformed(other.to_string()),
        }
    }
}

impl FromStr for Ttl {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<f64>() {
            Ok(secs) => Ttl::Seconds(secs),
            Err(_) => Ttl::Malformed(trimmed.to_string()),
        })
    }
}

/// Checks that a key is non-empty and at most `max_chars` characters long.
pub fn validate_key(key: &str, max_chars: usize) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::invalid_key("key must not be empty"));
    }
    let chars = key.chars().count();
    if chars > max_chars {
        return Err(StorageError::invalid_key(format!(
            "key is {chars} characters long (max: {max_chars})"
        )));
    }
    Ok(())
}

/// Checks that a value is a JSON object no larger than `max_bytes` once
/// serialized, and returns the object with its serialized size.
pub fn validate_value(value: Value, max_bytes: usize) -> StorageResult<(Object, usize)> {
    let object = match value {
        Value::Object(object) => object,
        Value::Null => return Err(StorageError::invalid_value("value must not be null")),
        Value::Array(_) => return Err(StorageError::invalid_value("arrays are not accepted")),
        other => {
            return Err(StorageError::invalid_value(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )))
        }
    };

    let size = serialized_len(&object)?;
    if size > max_bytes {
        return Err(StorageError::invalid_value(format!(
            "value is {size} bytes once serialized (max: {max_bytes})"
        )));
    }
    Ok((object, size))
}

/// Checks a TTL and converts it to a duration. Zero means no expiry.
pub fn validate_ttl(ttl: &Ttl) -> StorageResult<Option<Duration>> {
    let secs = match ttl {
        Ttl::Never => return Ok(None),
        Ttl::Malformed(raw) => {
            return Err(StorageError::invalid_ttl(format!("{raw:?} is not a number")))
        }
        Ttl::Seconds(secs) => *secs,
    };

    if !secs.is_finite() {
        return Err(StorageError::invalid_ttl(format!("{secs} is not finite")));
    }
    if secs.fract() != 0.0 {
        return Err(StorageError::invalid_ttl(format!(
            "{secs} is not a whole number of seconds"
        )));
    }
    if secs < 0.0 {
        return Err(StorageError::invalid_ttl(format!("{secs} is negative")));
    }
    if secs == 0.0 {
        return Ok(None);
    }
    Duration::try_from_secs_f64(secs)
        .map(Some)
        .map_err(|_| StorageError::invalid_ttl(format!("{secs} seconds is out of range")))
}

fn serialized_len(object: &Object) -> StorageResult<usize> {
    serde_json::to_vec(object)
        .map(|bytes| bytes.len())
        .map_err(|e| StorageError::invalid_value(e.to_string()))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
