//! Store configuration.
//!
//! # Invariants
//! - `storage_key` is non-blank after trim.
//! - `stats_window_days` is at least one day.

use chrono::Duration;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_STORAGE_KEY: &str = "inner-mastery-data";
pub const DEFAULT_REMOVAL_DELAY_MS: u64 = 1500;
pub const DEFAULT_STATS_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    BlankStorageKey,
    EmptyStatsWindow,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankStorageKey => write!(f, "storage key must not be blank"),
            Self::EmptyStatsWindow => write!(f, "stats window must cover at least one day"),
        }
    }
}

impl Error for ConfigError {}

/// Tunables for `StateStore` and its persistence provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Key under which the serialized aggregate is stored.
    pub storage_key: String,
    /// Delay between completing a disappearing task and removing it.
    pub removal_delay_ms: u64,
    /// Trailing window, in days, for `averageDailyCompletion`.
    pub stats_window_days: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            removal_delay_ms: DEFAULT_REMOVAL_DELAY_MS,
            stats_window_days: DEFAULT_STATS_WINDOW_DAYS,
        }
    }
}

impl StoreConfig {
    /// Builds a config with a custom storage key and default tunables.
    ///
    /// # Errors
    /// - Returns `ConfigError::BlankStorageKey` for a blank key.
    pub fn with_storage_key(storage_key: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            storage_key: storage_key.into().trim().to_string(),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::BlankStorageKey);
        }
        if self.stats_window_days == 0 {
            return Err(ConfigError::EmptyStatsWindow);
        }
        Ok(())
    }

    pub fn removal_delay(&self) -> Duration {
        Duration::milliseconds(i64::try_from(self.removal_delay_ms).unwrap_or(i64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig, DEFAULT_STORAGE_KEY};

    #[test]
    fn default_config_is_valid() {
        let config = StoreConfig::default();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.removal_delay().num_milliseconds(), 1500);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_storage_key_is_rejected() {
        let err = StoreConfig::with_storage_key("   ").unwrap_err();
        assert_eq!(err, ConfigError::BlankStorageKey);
    }

    #[test]
    fn zero_window_is_rejected() {
        let config = StoreConfig {
            stats_window_days: 0,
            ..StoreConfig::default()
        };
        assert_eq!(config.validate().unwrap_err(), ConfigError::EmptyStatsWindow);
    }
}
