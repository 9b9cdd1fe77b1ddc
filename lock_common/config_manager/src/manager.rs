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

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::ConfigError;

/// A configuration document that can check its own values after parsing.
pub trait Settings: DeserializeOwned + Send + Sync + 'static {
    /// Reject values that parse but make no sense. Accepts everything by default.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// A thread-safe singleton holding configuration loaded from YAML.
///
/// The first successful `initialize` wins; later calls leave the stored value untouched.
pub struct ConfigSingleton<T: Settings> {
    instance: OnceLock<T>,
}

impl<T: Settings> ConfigSingleton<T> {
    /// Creates a new, uninitialized `ConfigSingleton` instance.
    pub const fn new() -> Self {
        ConfigSingleton {
            instance: OnceLock::new(),
        }
    }

    /// Loads and validates the YAML file at `path`.
    ///
    /// # Errors
    ///
    /// * `ConfigError::Io` - The file cannot be read.
    /// * `ConfigError::Parse` - The content does not deserialize into `T`.
    /// * `ConfigError::Invalid` - `T::validate` rejected the parsed values.
    pub fn initialize<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        if self.instance.get().is_some() {
            return Ok(());
        }
        let contents = fs::read_to_string(path)?;
        self.initialize_from_str(&contents)
    }

    /// Same as `initialize`, for YAML that is already in memory.
    ///
    /// A no-op once a value is stored, including when another thread stores one
    /// between the check and the write.
    pub fn initialize_from_str(&self, contents: &str) -> Result<(), ConfigError> {
        if self.instance.get().is_some() {
            return Ok(());
        }
        let config = parse::<T>(contents)?;
        // a value that loses the race is discarded, the first one stays
        let _ = self.instance.set(config);
        Ok(())
    }

    /// Stores an already-built value, e.g. defaults when no file is given.
    ///
    /// Like `initialize`, a no-op once a value is stored; `config` is still validated.
    pub fn initialize_with(&self, config: T) -> Result<(), ConfigError> {
        config.validate()?;
        let _ = self.instance.set(config);
        Ok(())
    }


    /// Retrieves a reference to the initialized configuration instance.
    pub fn get_instance(&self) -> Result<&T, ConfigError> {
        self.instance.get().ok_or(ConfigError::NotInitialized)
    }
}

impl<T: Settings> Default for ConfigSingleton<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse and validate a YAML document without touching any singleton.
pub fn parse<T: Settings>(contents: &str) -> Result<T, ConfigError> {
    let config: T = serde_yaml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}
