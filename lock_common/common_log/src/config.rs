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
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub loggers: Vec<LoggerConfig>,
}

/// One rolling log file. `path_prefix` is the module path routed to it, `root` for the root logger.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggerConfig {
    pub path_prefix: String,
    pub log_directory: String,
    pub log_file_name: String,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_max_zip_count")]
    pub max_zip_count: u32,
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_max_zip_count() -> u32 {
    6
}

fn default_level() -> String {
    "info".to_string()
}

impl LogConfig {
    pub fn from_yaml(path: impl Into<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let config_str = std::fs::read_to_string(path.into())?;
        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: LogConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    pub fn get_logger_config(&self, path_prefix: &str) -> Option<&LoggerConfig> {
        self.loggers.iter().find(|l| path_prefix.starts_with(&l.path_prefix))
    }

    pub fn get_root_config(&self) -> Option<&LoggerConfig> {
        self.get_logger_config("root")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_defaults() {
        let yaml = r#"
loggers:
  - path_prefix: root
    log_directory: logs
    log_file_name: lock.log
  - path_prefix: distributed_lock
    log_directory: logs
    log_file_name: distributed_lock.log
    max_file_size: 2048
    max_zip_count: 2
    level: debug
"#;
        let config = LogConfig::from_yaml_str(yaml).unwrap();
        let root = config.get_root_config().unwrap();
        assert_eq!(root.level, "info");
        assert_eq!(root.max_zip_count, 6);

        let lock = config.get_logger_config("distributed_lock::retrier").unwrap();
        assert_eq!(lock.log_file_name, "distributed_lock.log");
        assert_eq!(lock.max_file_size, 2048);
    }

    #[test]
    fn test_no_root_logger() {
        let config = LogConfig::from_yaml_str("loggers: []").unwrap();
        assert!(config.get_root_config().is_none());
    }
}
