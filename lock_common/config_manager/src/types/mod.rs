pub mod settings;

pub use settings::{LockConfig, LockSettings, LoggingConfig, StoreConfig, SETTINGS};
