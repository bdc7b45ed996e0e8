//! Runtime configuration for embedders.
//!
//! # Responsibility
//! - Hold reminder timing and store location defaults.
//! - Resolve the store path from the environment for FFI/CLI hosts.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Environment variable overriding the store file location.
pub const STORE_PATH_ENV: &str = "TASKMASTER_DB_PATH";
/// Store file name used under the temp dir when no override is set.
pub const DEFAULT_STORE_FILE_NAME: &str = "taskmaster.sqlite3";

const DEFAULT_INITIAL_DELAY_MS: i64 = 5_000;
const DEFAULT_INTERVAL_MS: i64 = 2 * 60 * 60 * 1000;

/// Reminder timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderConfig {
    /// Delay between arming the schedule and the first firing.
    pub initial_delay_ms: i64,
    /// Period between subsequent firings.
    pub interval_ms: i64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl ReminderConfig {
    /// Builds a validated configuration.
    ///
    /// # Errors
    /// - `ConfigError::NonPositiveInterval` when `interval_ms <= 0`.
    /// - `ConfigError::NegativeDelay` when `initial_delay_ms < 0`.
    pub fn new(initial_delay_ms: i64, interval_ms: i64) -> Result<Self, ConfigError> {
        if interval_ms <= 0 {
            return Err(ConfigError::NonPositiveInterval(interval_ms));
        }
        if initial_delay_ms < 0 {
            return Err(ConfigError::NegativeDelay(initial_delay_ms));
        }
        Ok(Self {
            initial_delay_ms,
            interval_ms,
        })
    }

    /// Interval rendered for user-facing copy, e.g. `2 hours`.
    pub fn interval_label(&self) -> String {
        const HOUR_MS: i64 = 60 * 60 * 1000;
        const MINUTE_MS: i64 = 60 * 1000;
        if self.interval_ms % HOUR_MS == 0 {
            plural(self.interval_ms / HOUR_MS, "hour")
        } else if self.interval_ms % MINUTE_MS == 0 {
            plural(self.interval_ms / MINUTE_MS, "minute")
        } else {
            plural(self.interval_ms / 1000, "second")
        }
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Resolves the store path: explicit value, then env override, then temp dir.
pub fn resolve_store_path(explicit: Option<&str>) -> PathBuf {
    if let Some(path) = explicit.map(str::trim).filter(|value| !value.is_empty()) {
        return PathBuf::from(path);
    }
    if let Ok(raw) = std::env::var(STORE_PATH_ENV) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    std::env::temp_dir().join(DEFAULT_STORE_FILE_NAME)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NonPositiveInterval(i64),
    NegativeDelay(i64),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveInterval(value) => {
                write!(f, "reminder interval must be positive, got {value}ms")
            }
            Self::NegativeDelay(value) => {
                write!(f, "reminder initial delay must not be negative, got {value}ms")
            }
        }
    }
}

impl Error for ConfigError {}
