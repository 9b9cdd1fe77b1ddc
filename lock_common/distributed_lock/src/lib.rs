//! Distributed lock module, providing a mutual-exclusion lock on top of a
//! key-value store with atomic scripts and per-key expiry (Redis).
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use distributed_lock::{Lock, LockRedisClient};
//!
//! # async fn run() -> distributed_lock::Result<()> {
//! let store = Arc::new(LockRedisClient::from_env().await?);
//! let lock = Lock::new(store, "nightly-report", Duration::from_secs(5));
//!
//! lock.acquire().await?;
//! // critical section
//! lock.release().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod lock;
pub mod memory;
pub mod operations;
pub mod retrier;
pub mod scripts;

pub use client::LockRedisClient;
pub use error::{DistributedLockError, Result};
pub use lock::{Lock, KEY_PREFIX, MIN_LOCK_DURATION, POLL_INTERVAL};
pub use memory::MemoryStore;
pub use operations::{AcquireOutcome, AtomicOperations, ReleaseOutcome};
pub use retrier::{BoundedRetrier, RetryOutcome, RetryState};
