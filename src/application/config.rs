//! Suppressor configuration and its validation.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default window lifetime: one hour.
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(3600);

/// Default near-duplicate threshold on normalized edit distance.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;

/// Error returned when a suppressor configuration is invalid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// The window must live for a non-zero duration
    #[error("expiry must be greater than 0")]
    ZeroExpiry,
    /// Expiry is stored as whole seconds
    #[error("expiry must be a whole number of seconds, got {0:?}")]
    FractionalExpiry(Duration),
    /// Threshold must be a finite number within [0, 1]
    #[error("similarity threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),
    /// A cap of zero entries could never remember anything
    #[error("max_entries must be greater than 0")]
    ZeroMaxEntries,
}

/// Tunables of the duplicate-reply suppressor.
///
/// Every field has a default, so a partial YAML section is valid:
///
/// ```
/// use reply_throttle::SuppressorConfig;
/// use std::time::Duration;
///
/// let config: SuppressorConfig = serde_yaml::from_str("expiry_secs: 60").unwrap();
/// assert_eq!(config.expiry, Duration::from_secs(60));
/// assert_eq!(config.similarity_threshold, 0.5);
/// assert!(!config.suppress_empty_replies);
/// assert!(config.record_empty_replies);
/// assert_eq!(config.max_entries, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuppressorConfig {
    /// Lifetime of a window before it is discarded wholesale
    #[serde(rename = "expiry_secs", with = "duration_secs")]
    pub expiry: Duration,
    /// Queries whose distance is below this value are near-duplicates
    pub similarity_threshold: f64,
    /// Whether an empty candidate reply can be suppressed at all
    pub suppress_empty_replies: bool,
    /// Whether an allowed empty reply is remembered in the window
    pub record_empty_replies: bool,
    /// Optional cap on entries per window, evicting oldest first
    pub max_entries: Option<usize>,
}

impl Default for SuppressorConfig {
    fn default() -> Self {
        Self {
            expiry: DEFAULT_EXPIRY,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            suppress_empty_replies: false,
            record_empty_replies: true,
            max_entries: None,
        }
    }
}

impl SuppressorConfig {
    /// Check every field.
    ///
    /// # Errors
    /// Returns the first `BuildError` found.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.expiry.is_zero() {
            return Err(BuildError::ZeroExpiry);
        }
        if self.expiry.subsec_nanos() != 0 {
            return Err(BuildError::FractionalExpiry(self.expiry));
        }
        if !self.similarity_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.similarity_threshold)
        {
            return Err(BuildError::InvalidThreshold(self.similarity_threshold));
        }
        if self.max_entries == Some(0) {
            return Err(BuildError::ZeroMaxEntries);
        }
        Ok(())
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SuppressorConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.expiry, Duration::from_secs(3600));
    }

    #[test]
    fn test_zero_expiry_rejected() {
        let config = SuppressorConfig {
            expiry: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(BuildError::ZeroExpiry));
    }

    #[test]
    fn test_fractional_expiry_rejected() {
        for expiry in [Duration::from_millis(500), Duration::from_millis(60_250)] {
            let config = SuppressorConfig {
                expiry,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(BuildError::FractionalExpiry(expiry)));
        }
    }

    #[test]
    fn test_threshold_bounds() {
        for threshold in [0.0, 0.1, 0.75, 1.0] {
            let config = SuppressorConfig {
                similarity_threshold: threshold,
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "{threshold} should be accepted");
        }

        for threshold in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            let config = SuppressorConfig {
                similarity_threshold: threshold,
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(BuildError::InvalidThreshold(_))),
                "{threshold} should be rejected"
            );
        }
    }

    #[test]
    fn test_zero_max_entries_rejected() {
        let config = SuppressorConfig {
            max_entries: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(BuildError::ZeroMaxEntries));
    }

    #[test]
    fn test_yaml_round_trip_uses_seconds() {
        let config = SuppressorConfig {
            expiry: Duration::from_secs(60),
            similarity_threshold: 0.1,
            suppress_empty_replies: true,
            record_empty_replies: false,
            max_entries: Some(500),
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(yaml.contains("expiry_secs: 60"));

        let parsed: SuppressorConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<SuppressorConfig, _> = serde_yaml::from_str("expiry: 60");
        assert!(result.is_err());
    }
}
