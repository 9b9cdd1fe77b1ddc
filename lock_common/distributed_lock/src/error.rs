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

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DistributedLockError {
    #[error("Redis operation failed: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Store unavailable: {0}")]
    Store(#[from] cache::RedisError),

    #[error("Unexpected reply from lock script: {0}")]
    UnexpectedReply(String),

    #[error("Lock acquisition timed out after {0:?}")]
    AcquireTimeout(Duration),

    #[error("Lock release timed out after {0:?}")]
    ReleaseTimeout(Duration),

    #[error("Lock task did not complete: {0}")]
    TaskFailed(String),
}

impl DistributedLockError {
    /// True for the two deadline variants, false for store and task failures.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::AcquireTimeout(_) | Self::ReleaseTimeout(_))
    }
}

pub type Result<T> = std::result::Result<T, DistributedLockError>;
