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

mod commands;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use cache::RedisClient;
use clap::Parser;
use config_manager::types::{LockSettings, SETTINGS};
use config_manager::ConfigError;
use distributed_lock::{AtomicOperations, Lock, LockRedisClient};
use log::{error, info};

use crate::commands::LockCommands;

#[derive(Parser)]
#[clap(author, version, about = "Take and release distributed locks held in redis", long_about = None)]
struct Cli {
    /// YAML configuration file
    #[clap(short, long)]
    config: Option<String>,

    /// Redis url, overrides the configuration file and REDIS_URL
    #[clap(short, long)]
    redis_url: Option<String>,

    #[clap(subcommand)]
    command: LockCommands,
}

fn load_settings(path: Option<&str>) -> Result<&'static LockSettings, ConfigError> {
    match path {
        Some(path) => SETTINGS.initialize(path)?,
        None => SETTINGS.initialize_with(LockSettings::default())?,
    }
    SETTINGS.get_instance()
}

// logging.level only drives the console logger; a log4rs file sets its own levels
fn init_logging(settings: &LockSettings) {
    let result = match &settings.logging.config_path {
        Some(path) => common_log::init_with_yaml(path),
        None => common_log::init_console(&settings.logging.level),
    };
    if let Err(e) = result {
        eprintln!("error: failed to initialize logging: {}", e);
    }
}

async fn connect(cli: &Cli, settings: &LockSettings) -> Result<Arc<dyn AtomicOperations>, String> {
    let client = match &cli.redis_url {
        Some(url) => RedisClient::connect(url).await,
        None => RedisClient::from_config(&settings.store).await,
    }
    .map_err(|e| e.to_string())?;
    client.ping().await.map_err(|e| e.to_string())?;
    Ok(Arc::new(LockRedisClient::new(client)))
}

fn window(duration_ms: Option<u64>, settings: &LockSettings) -> Duration {
    duration_ms.map(Duration::from_millis).unwrap_or_else(|| settings.default_duration())
}

async fn run(command: &LockCommands, store: Arc<dyn AtomicOperations>, settings: &LockSettings) -> bool {
    match command {
        LockCommands::TryLock { name, duration_ms } => {
            let lock = Lock::new(store, name, window(*duration_ms, settings));
            let acquired = lock.try_lock().await;
            println!("{}: {}", lock.key(), if acquired { "acquired" } else { "not acquired" });
            acquired
        },
        LockCommands::TryUnlock { name } => {
            let lock = Lock::new(store, name, settings.default_duration());
            let released = lock.try_unlock().await;
            println!("{}: {}", lock.key(), if released { "released" } else { "release failed" });
            released
        },
        LockCommands::Lock { name, duration_ms, hold_ms } => {
            let lock = Lock::new(store, name, window(*duration_ms, settings));
            if let Err(e) = lock.acquire().await {
                println!("{}: not acquired ({})", lock.key(), e);
                return false;
            }
            println!("{}: acquired for {:?}", lock.key(), lock.duration());
            match hold_ms {
                Some(hold_ms) => {
                    tokio::time::sleep(Duration::from_millis(*hold_ms)).await;
                    release(&lock).await
                },
                None => true,
            }
        },
        LockCommands::Unlock { name, duration_ms } => {
            let lock = Lock::new(store, name, window(*duration_ms, settings));
            release(&lock).await
        },
    }
}

async fn release(lock: &Lock) -> bool {
    match lock.release().await {
        Ok(()) => {
            println!("{}: released", lock.key());
            true
        },
        Err(e) => {
            println!("{}: release failed ({})", lock.key(), e);
            false
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        },
    };
    init_logging(settings);

    let store = match connect(&cli, settings).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to connect to redis: {}", e);
            eprintln!("error: failed to connect to redis: {}", e);
            return ExitCode::FAILURE;
        },
    };

    info!("Running {:?}", cli.command);
    if run(&cli.command, store, settings).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distributed_lock::MemoryStore;

    fn settings() -> LockSettings {
        LockSettings::default()
    }

    #[test]
    fn test_parse_lock_command() {
        let cli = Cli::try_parse_from(["lock_cli", "--redis-url", "redis://h:1/", "lock", "jobs", "-d", "700", "--hold-ms", "20"]).unwrap();
        assert_eq!(cli.redis_url.as_deref(), Some("redis://h:1/"));
        match cli.command {
            LockCommands::Lock { name, duration_ms, hold_ms } => {
                assert_eq!(name, "jobs");
                assert_eq!(duration_ms, Some(700));
                assert_eq!(hold_ms, Some(20));
            },
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_window_defaults_to_settings() {
        assert_eq!(window(None, &settings()), Duration::from_secs(10));
        assert_eq!(window(Some(450), &settings()), Duration::from_millis(450));
    }

    #[tokio::test]
    async fn test_run_try_lock_twice() {
        let store: Arc<dyn AtomicOperations> = Arc::new(MemoryStore::new());
        let command = LockCommands::TryLock { name: "cli".to_string(), duration_ms: Some(5_000) };
        assert!(run(&command, store.clone(), &settings()).await);
        assert!(!run(&command, store.clone(), &settings()).await);

        let unlock = LockCommands::TryUnlock { name: "cli".to_string() };
        assert!(run(&unlock, store.clone(), &settings()).await);
        assert!(run(&command, store, &settings()).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_lock_with_hold_releases() {
        let store: Arc<dyn AtomicOperations> = Arc::new(MemoryStore::new());
        let command = LockCommands::Lock { name: "held".to_string(), duration_ms: Some(400), hold_ms: Some(10) };
        assert!(run(&command, store.clone(), &settings()).await);

        let probe = Lock::new(store, "held", Duration::from_secs(1));
        assert!(probe.try_lock().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_lock_times_out_on_held_key() {
        let store: Arc<dyn AtomicOperations> = Arc::new(MemoryStore::new());
        let holder = Lock::new(store.clone(), "taken", Duration::from_secs(10));
        assert!(holder.try_lock().await);

        let command = LockCommands::Lock { name: "taken".to_string(), duration_ms: Some(300), hold_ms: None };
        assert!(!run(&command, store, &settings()).await);
    }
}
