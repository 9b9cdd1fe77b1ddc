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

use async_trait::async_trait;

use super::error::Result;

/// Result of a single acquire against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The key was absent and has been created by this call
    Acquired,
    /// The key is already present
    Conflict,
}

/// Result of a single release against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The key was present and has been deleted
    Released,
    /// The key was already absent
    NoOp,
}

/// The two store-evaluated procedures a lock is built on.
///
/// Each call must be a single indivisible check-then-act step inside the store:
/// no other caller may observe the key between the existence check and the write.
/// Implementations are shared between many locks and concurrent calls.
#[async_trait]
pub trait AtomicOperations: Send + Sync {
    /// Create `key` unless it exists, expiring at `expire_at_ms` (unix epoch milliseconds).
    async fn acquire(&self, key: &str, expire_at_ms: i64) -> Result<AcquireOutcome>;

    /// Delete `key` if it exists.
    async fn release(&self, key: &str) -> Result<ReleaseOutcome>;
}
