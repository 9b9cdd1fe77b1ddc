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

use std::future::Future;
use std::time::Duration;

use log::debug;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::error::{DistributedLockError, Result};

/// Where a bounded retry currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Idle,
    Attempting,
    Succeeded,
    TimedOut,
}

/// How a bounded retry ended
#[derive(Debug)]
pub struct RetryOutcome {
    /// `Succeeded` or `TimedOut`
    pub state: RetryState,
    /// Number of attempts made, the immediate one included
    pub attempts: u32,
    /// Error of the final attempt when it failed in the store rather than on contention
    pub last_error: Option<DistributedLockError>,
    pub elapsed: Duration,
}

impl RetryOutcome {
    pub fn succeeded(&self) -> bool {
        self.state == RetryState::Succeeded
    }
}

/// Turns a single-shot attempt into a wait bounded by `deadline`.
///
/// The attempt runs once immediately, then once per `interval` until it reports
/// success or the deadline passes. The deadline only stops the waiting: an
/// attempt that has already started always runs to completion.
#[derive(Debug, Clone, Copy)]
pub struct BoundedRetrier {
    deadline: Duration,
    interval: Duration,
}

impl BoundedRetrier {
    /// `interval` is raised to 1ms when zero
    pub fn new(deadline: Duration, interval: Duration) -> Self {
        Self { deadline, interval: interval.max(Duration::from_millis(1)) }
    }

    /// Run `attempt` on its own task and wait for that task to finish.
    ///
    /// `attempt` yields `Ok(true)` on success, `Ok(false)` on contention and
    /// `Err` on store failure; both failures are retried. Dropping the returned
    /// future aborts the task, so no attempt is started for a caller that is gone.
    ///
    /// # Errors
    ///
    /// `DistributedLockError::TaskFailed` if the task panicked or was cancelled.
    pub async fn run<F, Fut>(&self, attempt: F) -> Result<RetryOutcome>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<bool>> + Send + 'static,
    {
        let mut task = AbortOnDrop(tokio::spawn(poll(self.deadline, self.interval, attempt)));
        (&mut task.0)
            .await
            .map_err(|e| DistributedLockError::TaskFailed(e.to_string()))
    }
}

struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn poll<F, Fut>(deadline: Duration, interval: Duration, mut attempt: F) -> RetryOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let started = Instant::now();
    let mut ticker = time::interval_at(started + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let expiry = time::sleep_until(started + deadline);
    tokio::pin!(expiry);

    let mut tracker = Tracker::new(started);
    if tracker.record(attempt().await) {
        return tracker.finish(RetryState::Succeeded);
    }
    tracker.state = RetryState::Attempting;

    loop {
        tokio::select! {
            biased;
            _ = &mut expiry => {
                return tracker.finish(RetryState::TimedOut);
            }
            _ = ticker.tick() => {
                if tracker.record(attempt().await) {
                    return tracker.finish(RetryState::Succeeded);
                }
            }
        }
    }
}

struct Tracker {
    state: RetryState,
    started: Instant,
    attempts: u32,
    last_error: Option<DistributedLockError>,
}

impl Tracker {
    fn new(started: Instant) -> Self {
        Self { state: RetryState::Idle, started, attempts: 0, last_error: None }
    }

    fn record(&mut self, result: Result<bool>) -> bool {
        self.attempts += 1;
        match result {
            Ok(done) => {
                self.last_error = None;
                done
            }
            Err(e) => {
                debug!("attempt {} failed: {}", self.attempts, e);
                self.last_error = Some(e);
                false
            }
        }
    }

    fn finish(self, state: RetryState) -> RetryOutcome {
        debug!("retry {:?} -> {:?} after {} attempt(s)", self.state, state, self.attempts);
        RetryOutcome {
            state,
            attempts: self.attempts,
            last_error: self.last_error,
            elapsed: self.started.elapsed(),
        }
    }
}
