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

/// Configuration loading for the lock tooling.
///
/// Settings live in a YAML file and are loaded once into a process-wide
/// `OnceLock`, after which they can be read from any thread.
///
/// # Example
///
/// ```no_run
/// use config_manager::types::LockSettings;
/// use config_manager::ConfigSingleton;
///
/// static SETTINGS: ConfigSingleton<LockSettings> = ConfigSingleton::new();
///
/// SETTINGS.initialize("lock_config.yaml").expect("Failed to load config");
/// let settings = SETTINGS.get_instance().expect("Config not initialized");
/// println!("Locking against {}", settings.store.redis_url);
/// ```
pub mod error;
pub mod manager;
pub mod types;

pub use error::ConfigError;
pub use manager::{ConfigSingleton, Settings};
