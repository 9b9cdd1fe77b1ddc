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

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use super::error::Result;
use super::operations::{AcquireOutcome, AtomicOperations, ReleaseOutcome};

/// Process-local store with the same semantics as the Redis scripts.
///
/// Keys map to their absolute expiry in unix milliseconds. An entry whose expiry
/// has passed is treated as absent, mirroring passive expiry in Redis.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is currently held
    pub fn contains(&self, key: &str) -> bool {
        let now = Utc::now().timestamp_millis();
        self.entries.lock().get(key).is_some_and(|&expire_at| expire_at > now)
    }
}

#[async_trait]
impl AtomicOperations for MemoryStore {
    async fn acquire(&self, key: &str, expire_at_ms: i64) -> Result<AcquireOutcome> {
        let now = Utc::now().timestamp_millis();
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(&expire_at) if expire_at > now => Ok(AcquireOutcome::Conflict),
            _ => {
                entries.insert(key.to_string(), expire_at_ms);
                Ok(AcquireOutcome::Acquired)
            }
        }
    }

    async fn release(&self, key: &str) -> Result<ReleaseOutcome> {
        let now = Utc::now().timestamp_millis();
        match self.entries.lock().remove(key) {
            Some(expire_at) if expire_at > now => Ok(ReleaseOutcome::Released),
            _ => Ok(ReleaseOutcome::NoOp),
        }
    }
}
