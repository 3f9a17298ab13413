//! Config loading and persistence.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub reconnect: ReconnectConfig,
    pub logging: LoggingConfig,
}

/// Broadcast-channel reattachment policy: bounded attempt count with an
/// increasing, capped delay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            backoff_base_ms: 250,
            backoff_max_ms: 5_000,
        }
    }
}

impl ReconnectConfig {
    /// Delay before the given attempt (0-based): base doubled per attempt,
    /// capped at the maximum. `None` once attempts are exhausted.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let ms = self
            .backoff_base_ms
            .saturating_mul(factor)
            .min(self.backoff_max_ms);
        Some(Duration::from_millis(ms))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 0 = warn, 1 = info, 2 = debug, 3+ = trace.
    pub verbosity: u8,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { verbosity: 1 }
    }
}

pub fn config_path() -> PathBuf {
    crate::paths::config_dir().join("config.toml")
}

pub fn load() -> Result<Config, String> {
    let path = config_path();
    let contents = fs::read_to_string(&path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    toml::from_str(&contents).map_err(|e| format!("failed to parse {}: {e}", path.display()))
}

/// Load the config file, falling back to defaults if it is absent or
/// malformed. A bad config never stops a client from starting.
pub fn load_or_init() -> Config {
    match load() {
        Ok(config) => config,
        Err(reason) => {
            if config_path().exists() {
                warn!(reason, "config unreadable, using defaults");
            }
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_and_caps() {
        let reconnect = ReconnectConfig::default();
        assert_eq!(reconnect.delay_for(0), Some(Duration::from_millis(250)));
        assert_eq!(reconnect.delay_for(1), Some(Duration::from_millis(500)));
        assert_eq!(reconnect.delay_for(2), Some(Duration::from_millis(1_000)));
        assert_eq!(reconnect.delay_for(7), Some(Duration::from_millis(5_000)));
    }

    #[test]
    fn backoff_is_bounded() {
        let reconnect = ReconnectConfig {
            max_attempts: 3,
            ..ReconnectConfig::default()
        };
        assert!(reconnect.delay_for(2).is_some());
        assert_eq!(reconnect.delay_for(3), None);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.reconnect.max_attempts, config.reconnect.max_attempts);
        assert_eq!(parsed.logging.verbosity, config.logging.verbosity);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str("[reconnect]\nmax_attempts = 2\n").unwrap();
        assert_eq!(parsed.reconnect.max_attempts, 2);
        assert_eq!(parsed.reconnect.backoff_base_ms, 250);
        assert_eq!(parsed.logging.verbosity, 1);
    }
}
