//! Entry Expiry
//!
//! Expiry in jsonkv is purely lazy: an entry carries an absolute deadline and
//! is checked against the wall clock whenever it is read or deleted. Nothing
//! runs in the background, so an expired entry stays in the file until a
//! rewrite prunes it (see [`StorageConfig::prune_expired`]).
//!
//! ## Why Wall-Clock Time?
//!
//! Deadlines outlive the process that wrote them, so they are stored as
//! milliseconds since the UNIX epoch rather than as an `Instant`.
//!
//! ## On-Disk Form
//!
//! ```text
//! "timeToLive": false            -> Expiry::Never
//! "timeToLive": 1700000000000    -> Expiry::At(1700000000000)
//! ```
//!
//! A missing or `null` field also reads as `Never`.
//!
//! [`StorageConfig::prune_expired`]: crate::storage::StorageConfig::prune_expired

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// When an entry stops being visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiry {
    /// The entry never expires
    #[default]
    Never,
    /// The entry expires at this many milliseconds since the UNIX epoch
    At(u64),
}

impl Expiry {
    /// Computes the deadline `ttl` from now. A zero TTL never expires.
    pub fn after(ttl: Duration) -> Self {
        if ttl.is_zero() {
            return Expiry::Never;
        }
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        Expiry::At(now_millis().saturating_add(ttl_ms))
    }

    /// Checks whether the deadline has been reached at `now_ms`.
    #[inline]
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self {
            Expiry::Never => false,
            Expiry::At(deadline) => now_ms >= *deadline,
        }
    }

    /// Checks whether the deadline has been reached.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_millis())
    }

    /// Returns the remaining time in milliseconds, or None if no expiry.
    pub fn remaining_ms(&self) -> Option<u64> {
        match self {
            Expiry::Never => None,
            Expiry::At(deadline) => Some(deadline.saturating_sub(now_millis())),
        }
    }
}

/// Current wall-clock time in milliseconds since the UNIX epoch.
///
/// A clock set before 1970 reads as zero, which makes every deadline look
/// live rather than panicking.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Serde adapter for the `timeToLive` field.
pub(crate) mod time_to_live {
    use super::Expiry;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Millis(u64),
        Float(f64),
    }

    pub fn serialize<S: Serializer>(expiry: &Expiry, serializer: S) -> Result<S::Ok, S::Error> {
        match expiry {
            Expiry::Never => serializer.serialize_bool(false),
            Expiry::At(ms) => serializer.serialize_u64(*ms),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Expiry, D::Error> {
        match Option::<Raw>::deserialize(deserializer)? {
            None | Some(Raw::Flag(false)) => Ok(Expiry::Never),
            Some(Raw::Flag(true)) => Err(D::Error::custom(
                "timeToLive must be false or a timestamp",
            )),
            Some(Raw::Millis(ms)) => Ok(Expiry::At(ms)),
            Some(Raw::Float(ms)) if ms.is_finite() && ms >= 0.0 => Ok(Expiry::At(ms as u64)),
            Some(Raw::Float(ms)) => Err(D::Error::custom(format!(
                "timeToLive is not a valid timestamp: {ms}"
            ))),
        }
    }
}
