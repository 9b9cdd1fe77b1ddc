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

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info, warn};

use super::error::{DistributedLockError, Result};
use super::operations::{AcquireOutcome, AtomicOperations, ReleaseOutcome};
use super::retrier::BoundedRetrier;

/// Namespace prepended to every lock name
pub const KEY_PREFIX: &str = "lock:";

/// Shortest validity window a lock can have
pub const MIN_LOCK_DURATION: Duration = Duration::from_millis(300);

/// Wait between two attempts of a blocking call
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Distributed Lock Structure
///
/// An immutable descriptor: the namespaced key plus the validity window. It holds
/// no resource itself, so it can be cloned or dropped at any time.
///
/// The store keeps a plain marker under the key, not an owner token. Any caller
/// can release any lock, including one it never acquired.
///
/// Expiry is sent as an absolute timestamp computed from this process' clock, so
/// the caller and store clocks are assumed to be reasonably in sync. A skewed
/// caller shortens or lengthens every lock it takes by the size of the skew.
#[derive(Clone)]
pub struct Lock {
    /// Store the scripts run against
    store: Arc<dyn AtomicOperations>,
    /// Lock key name, `lock:<name>`
    key: String,
    /// Validity window, also the deadline of the blocking calls
    duration: Duration,
}

impl Lock {
    /// Create a new distributed lock instance
    ///
    /// # Arguments
    ///
    /// * `store` - Atomic operations backend, shared with other locks
    /// * `name` - Lock name, stored as `lock:<name>`
    /// * `duration` - Validity window, raised to `MIN_LOCK_DURATION` when shorter
    ///
    /// Nothing is sent to the store here.
    pub fn new(store: Arc<dyn AtomicOperations>, name: impl AsRef<str>, duration: Duration) -> Self {
        Self {
            store,
            key: format!("{}{}", KEY_PREFIX, name.as_ref()),
            duration: duration.max(MIN_LOCK_DURATION),
        }
    }

    /// Get lock key name
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the effective validity window
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// One acquire against the store with the outcome kept intact
    pub async fn attempt_lock(&self) -> Result<AcquireOutcome> {
        self.store.acquire(&self.key, expiry_timestamp(self.duration)).await
    }

    /// One release against the store with the outcome kept intact
    pub async fn attempt_unlock(&self) -> Result<ReleaseOutcome> {
        self.store.release(&self.key).await
    }

    /// Single non-blocking acquire.
    ///
    /// `false` covers both contention and a failed store call.
    pub async fn try_lock(&self) -> bool {
        match self.attempt_lock().await {
            Ok(AcquireOutcome::Acquired) => true,
            Ok(AcquireOutcome::Conflict) => {
                debug!("Lock {} is held elsewhere", self.key);
                false
            }
            Err(e) => {
                warn!("Failed to acquire lock {}: {}", self.key, e);
                false
            }
        }
    }

    /// Single non-blocking release.
    ///
    /// `true` whenever the store call went through, including when the key was
    /// already absent.
    pub async fn try_unlock(&self) -> bool {
        match self.attempt_unlock().await {
            Ok(ReleaseOutcome::Released) => true,
            Ok(ReleaseOutcome::NoOp) => {
                debug!("Lock {} was not held", self.key);
                true
            }
            Err(e) => {
                warn!("Failed to release lock {}: {}", self.key, e);
                false
            }
        }
    }

    /// Wait up to `duration` for the lock.
    ///
    /// # Errors
    ///
    /// * `AcquireTimeout` - The key stayed held until the deadline.
    /// * The store error of the last attempt when that attempt failed in the store.
    /// * `TaskFailed` - The retry task did not complete.
    ///
    /// An attempt still running at the deadline is not cancelled and may set the
    /// key after this returns; the key then lives until its own expiry.
    pub async fn acquire(&self) -> Result<()> {
        let lock = self.clone();
        let outcome = self
            .retrier()
            .run(move || {
                let lock = lock.clone();
                async move {
                    let outcome = lock.attempt_lock().await?;
                    Ok::<bool, DistributedLockError>(outcome == AcquireOutcome::Acquired)
                }
            })
            .await?;

        if outcome.succeeded() {
            info!("Acquired lock {} after {} attempt(s)", self.key, outcome.attempts);
            return Ok(());
        }
        Err(outcome
            .last_error
            .unwrap_or(DistributedLockError::AcquireTimeout(self.duration)))
    }

    /// Wait up to `duration` for a release to go through.
    ///
    /// Release only fails on store errors, so the error is normally the last
    /// store error; `ReleaseTimeout` is kept for completeness.
    pub async fn release(&self) -> Result<()> {
        let lock = self.clone();
        let outcome = self
            .retrier()
            .run(move || {
                let lock = lock.clone();
                async move {
                    lock.attempt_unlock().await?;
                    Ok::<bool, DistributedLockError>(true)
                }
            })
            .await?;

        if outcome.succeeded() {
            info!("Released lock {}", self.key);
            return Ok(());
        }
        Err(outcome
            .last_error
            .unwrap_or(DistributedLockError::ReleaseTimeout(self.duration)))
    }

    /// Blocking acquire that reports nothing.
    ///
    /// Returns on success and on timeout alike; callers that need to know which
    /// one happened use `acquire`.
    pub async fn lock(&self) {
        if let Err(e) = self.acquire().await {
            warn!("Lock {} returned without being acquired: {}", self.key, e);
        }
    }

    /// Blocking release that reports nothing, see `lock`.
    pub async fn unlock(&self) {
        if let Err(e) = self.release().await {
            warn!("Unlock {} returned without confirmation: {}", self.key, e);
        }
    }

    fn retrier(&self) -> BoundedRetrier {
        BoundedRetrier::new(self.duration, POLL_INTERVAL)
    }
}

impl fmt::Debug for Lock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lock")
            .field("key", &self.key)
            .field("duration", &self.duration)
            .finish()
    }
}

/// Unix milliseconds at which a lock taken now with `duration` expires
fn expiry_timestamp(duration: Duration) -> i64 {
    let ttl = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
    Utc::now().timestamp_millis().saturating_add(ttl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn store() -> Arc<dyn AtomicOperations> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_key_is_namespaced() {
        let lock = Lock::new(store(), "orders", Duration::from_secs(1));
        assert_eq!(lock.key(), "lock:orders");
    }

    #[test]
    fn test_duration_is_clamped() {
        assert_eq!(Lock::new(store(), "a", Duration::from_millis(50)).duration(), MIN_LOCK_DURATION);
        assert_eq!(Lock::new(store(), "a", Duration::ZERO).duration(), MIN_LOCK_DURATION);
        assert_eq!(
            Lock::new(store(), "a", Duration::from_millis(301)).duration(),
            Duration::from_millis(301)
        );
    }

    #[test]
    fn test_expiry_timestamp_is_in_the_future() {
        let before = Utc::now().timestamp_millis();
        let expiry = expiry_timestamp(Duration::from_millis(300));
        assert!(expiry >= before + 300);
        assert_eq!(expiry_timestamp(Duration::MAX), i64::MAX);
    }

    #[test]
    fn test_debug_hides_store() {
        let lock = Lock::new(store(), "dbg", Duration::from_secs(1));
        let text = format!("{:?}", lock);
        assert!(text.contains("lock:dbg"));
    }
}
