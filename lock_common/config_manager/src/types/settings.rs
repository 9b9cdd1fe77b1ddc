/*
 * Copyright (c) Huawei Technologies Co., Ltd. 2025. All rights reserved.
 * Global Trust Authority is licensed under the Mulan PSL v2.
 * You can use this software according to the terms and conditions of the Mulan PSL v2.
 * You may obtain a copy of Mulan PSL v2 at:
 *     http://license.coscl.org.cn/MulanPSL2
 * THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY KIND, EITHER EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR
 * PURPOSE.
 * See the Mulan PSL v2 for more details.
 */

use serde::Deserialize;
use std::time::Duration;

use crate::error::ConfigError;
use crate::manager::{ConfigSingleton, Settings};

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Top-level structure of the lock configuration file.
///
/// Every section is optional; missing sections take their defaults.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LockSettings {
    /// Key-value store connection settings
    #[serde(default)]
    pub store: StoreConfig,
    /// Lock defaults
    #[serde(default)]
    pub lock: LockConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Store connection settings
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Redis connection url
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
}

/// Lock defaults
#[derive(Debug, Deserialize, Clone)]
pub struct LockConfig {
    /// Validity window used when the caller does not pass one, in milliseconds
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: u64,
}

/// Logging settings
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// log4rs yaml describing file loggers; console logging is used when absent
    #[serde(default)]
    pub config_path: Option<String>,
    /// Console level. Not applied when `config_path` is set: the log4rs file
    /// carries its own root and per-module levels.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379/".to_string()
}

fn default_duration_ms() -> u64 {
    10_000
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { redis_url: default_redis_url() }
    }
}

impl Default for LockConfig {
    fn default() -> Self {
        Self { default_duration_ms: default_duration_ms() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { config_path: None, level: default_level() }
    }
}

impl LockSettings {
    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.lock.default_duration_ms)
    }
}

impl Settings for LockSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.redis_url.trim().is_empty() {
            return Err(ConfigError::Invalid("store.redis_url must not be empty".to_string()));
        }
        if self.lock.default_duration_ms == 0 {
            return Err(ConfigError::Invalid("lock.default_duration_ms must be positive".to_string()));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!("unknown logging.level {}", self.logging.level)));
        }
        Ok(())
    }
}

/// Process-wide settings, filled in by the binary at startup.
pub static SETTINGS: ConfigSingleton<LockSettings> = ConfigSingleton::new();

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::parse;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings: LockSettings = parse("{}").unwrap();
        assert_eq!(settings.store.redis_url, "redis://127.0.0.1:6379/");
        assert_eq!(settings.default_duration(), Duration::from_secs(10));
        assert_eq!(settings.logging.level, "info");
        assert!(settings.logging.config_path.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let yaml = r#"
lock:
  default_duration_ms: 750
logging:
  level: DEBUG
"#;
        let settings: LockSettings = parse(yaml).unwrap();
        assert_eq!(settings.default_duration(), Duration::from_millis(750));
        assert_eq!(settings.store.redis_url, "redis://127.0.0.1:6379/");
        assert_eq!(settings.logging.level, "DEBUG");
    }

    #[test]
    fn test_config_path_keeps_default_level() {
        let settings: LockSettings = parse("logging:\n  config_path: logging.yaml\n").unwrap();
        assert_eq!(settings.logging.config_path.as_deref(), Some("logging.yaml"));
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_zero_duration_rejected() {
        let result = parse::<LockSettings>("lock:\n  default_duration_ms: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_level_rejected() {
        let result = parse::<LockSettings>("logging:\n  level: loud\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_blank_url_rejected() {
        let result = parse::<LockSettings>("store:\n  redis_url: \"  \"\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
