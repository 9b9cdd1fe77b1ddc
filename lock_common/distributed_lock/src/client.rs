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
use cache::RedisClient;
use log::trace;
use redis::Script;

use super::error::{DistributedLockError, Result};
use super::operations::{AcquireOutcome, AtomicOperations, ReleaseOutcome};
use super::scripts::{ACQUIRE_LOCK, RELEASE_LOCK, REPLY_EXISTS, REPLY_OK};

/// Redis side of the lock: runs the acquire and release scripts.
///
/// Both scripts are compiled (hashed) once here and reused by every lock sharing
/// this client. Needs Redis 6.2 or newer for `SET ... PXAT`.
#[derive(Debug)]
pub struct LockRedisClient {
    client: RedisClient,
    acquire_script: Script,
    release_script: Script,
}

impl LockRedisClient {
    pub fn new(client: RedisClient) -> Self {
        Self {
            client,
            acquire_script: Script::new(ACQUIRE_LOCK),
            release_script: Script::new(RELEASE_LOCK),
        }
    }

    /// Connect to `url` and wrap the resulting client
    pub async fn connect(url: &str) -> Result<Self> {
        Ok(Self::new(RedisClient::connect(url).await?))
    }

    /// Connect to the server named by `REDIS_URL`
    pub async fn from_env() -> Result<Self> {
        Ok(Self::new(RedisClient::from_env().await?))
    }

    pub fn redis(&self) -> &RedisClient {
        &self.client
    }
}

#[async_trait]
impl AtomicOperations for LockRedisClient {
    async fn acquire(&self, key: &str, expire_at_ms: i64) -> Result<AcquireOutcome> {
        let mut conn = self.client.connection();
        let reply: Option<String> = self
            .acquire_script
            .key(key)
            .arg(expire_at_ms)
            .invoke_async(&mut conn)
            .await?;
        trace!("acquire script reply for {}: {:?}", key, reply);
        decode_acquire_reply(reply)
    }

    async fn release(&self, key: &str) -> Result<ReleaseOutcome> {
        let mut conn = self.client.connection();
        let deleted: i64 = self.release_script.key(key).invoke_async(&mut conn).await?;
        trace!("release script deleted {} key(s) for {}", deleted, key);
        Ok(decode_release_reply(deleted))
    }
}

/// `OK` means the key was set. `EXISTS`, or nil from a refused `SET NX`, means it is held.
fn decode_acquire_reply(reply: Option<String>) -> Result<AcquireOutcome> {
    match reply.as_deref() {
        Some(REPLY_OK) => Ok(AcquireOutcome::Acquired),
        Some(REPLY_EXISTS) | None => Ok(AcquireOutcome::Conflict),
        Some(other) => Err(DistributedLockError::UnexpectedReply(other.to_string())),
    }
}

fn decode_release_reply(deleted: i64) -> ReleaseOutcome {
    if deleted > 0 {
        ReleaseOutcome::Released
    } else {
        ReleaseOutcome::NoOp
    }
}
