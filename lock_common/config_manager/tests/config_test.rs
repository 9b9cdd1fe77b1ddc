use std::io::Write;
use std::time::Duration;

use config_manager::types::LockSettings;
use config_manager::{ConfigError, ConfigSingleton};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_initialize_from_file() {
    let file = write_config(
        r#"
store:
  redis_url: "redis://cache.internal:6379/2"
lock:
  default_duration_ms: 1500
"#,
    );
    let config = ConfigSingleton::<LockSettings>::new();
    config.initialize(file.path()).unwrap();

    let settings = config.get_instance().unwrap();
    assert_eq!(settings.store.redis_url, "redis://cache.internal:6379/2");
    assert_eq!(settings.default_duration(), Duration::from_millis(1500));
}

#[test]
fn test_get_instance_before_initialize() {
    let config = ConfigSingleton::<LockSettings>::new();
    assert!(matches!(config.get_instance(), Err(ConfigError::NotInitialized)));
}

#[test]
fn test_missing_file() {
    let config = ConfigSingleton::<LockSettings>::new();
    let result = config.initialize("/nonexistent/lock_config.yaml");
    assert!(matches!(result, Err(ConfigError::Io(_))));
    assert!(config.get_instance().is_err());
}

#[test]
fn test_malformed_yaml() {
    let file = write_config("lock: [unterminated");
    let config = ConfigSingleton::<LockSettings>::new();
    assert!(matches!(config.initialize(file.path()), Err(ConfigError::Parse(_))));
}

#[test]
fn test_first_initialization_wins() {
    let config = ConfigSingleton::<LockSettings>::new();
    config.initialize_from_str("lock:\n  default_duration_ms: 400\n").unwrap();
    config.initialize_from_str("lock:\n  default_duration_ms: 900\n").unwrap();
    assert_eq!(config.get_instance().unwrap().lock.default_duration_ms, 400);
}

#[test]
fn test_initialize_with_defaults() {
    let config = ConfigSingleton::<LockSettings>::new();
    config.initialize_with(LockSettings::default()).unwrap();
    assert_eq!(config.get_instance().unwrap().store.redis_url, "redis://127.0.0.1:6379/");
}

#[test]
fn test_initialize_with_after_file_keeps_file_values() {
    let config = ConfigSingleton::<LockSettings>::new();
    config.initialize_from_str("lock:\n  default_duration_ms: 400\n").unwrap();
    config.initialize_with(LockSettings::default()).unwrap();
    assert_eq!(config.get_instance().unwrap().lock.default_duration_ms, 400);
}

#[test]
fn test_initialize_with_still_validates_when_set() {
    let config = ConfigSingleton::<LockSettings>::new();
    config.initialize_with(LockSettings::default()).unwrap();

    let mut bad = LockSettings::default();
    bad.logging.level = "loud".to_string();
    assert!(matches!(config.initialize_with(bad), Err(ConfigError::Invalid(_))));
    assert_eq!(config.get_instance().unwrap().logging.level, "info");
}
