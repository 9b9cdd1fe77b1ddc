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

use config_manager::types::StoreConfig;
use log::{debug, info};
use redis::aio::ConnectionManager;
use redis::Client;

use crate::error::RedisError;

/// Environment variable that overrides the configured Redis address
pub const REDIS_URL_ENV: &str = "REDIS_URL";

/// Async Redis handle.
///
/// Wraps a multiplexed `ConnectionManager`, which reconnects on its own and can be
/// cloned freely, so a single `RedisClient` is meant to be shared by every lock
/// in the process.
#[derive(Clone)]
pub struct RedisClient {
    pub(crate) client: Client,
    manager: ConnectionManager,
}

impl RedisClient {
    /// Open a client for `url` and establish the managed connection.
    ///
    /// # Errors
    ///
    /// * `RedisError::InvalidUrl` - If the url cannot be parsed.
    /// * `RedisError::ConnectionError` - If the server cannot be reached.
    pub async fn connect(url: &str) -> Result<RedisClient, RedisError> {
        let client = Client::open(url).map_err(|e| RedisError::InvalidUrl(e.to_string()))?;
        let manager = ConnectionManager::new(client.clone())
            .await
            .map_err(RedisError::ConnectionError)?;
        info!("Connected to redis at {:?}", client.get_connection_info().addr);
        Ok(RedisClient { client, manager })
    }

    /// Connect using the address held in the `REDIS_URL` environment variable
    pub async fn from_env() -> Result<RedisClient, RedisError> {
        let redis_url = std::env::var(REDIS_URL_ENV)
            .map_err(|_| RedisError::OperationError("REDIS_URL environment variable not set".to_string()))?;
        Self::connect(&redis_url).await
    }

    /// Connect using the store section of the configuration file.
    ///
    /// `REDIS_URL` wins over the configured address when it is set.
    pub async fn from_config(config: &StoreConfig) -> Result<RedisClient, RedisError> {
        let redis_url = resolve_url(config);
        Self::connect(&redis_url).await
    }

    /// A handle to the managed connection, suitable for script invocation
    pub fn connection(&self) -> ConnectionManager {
        self.manager.clone()
    }

    /// Round-trip a PING to the server.
    pub async fn ping(&self) -> Result<(), RedisError> {
        let mut conn = self.connection();
        let reply: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(RedisError::ConnectionError)?;
        debug!("redis ping reply: {}", reply);
        if reply == "PONG" {
            Ok(())
        } else {
            Err(RedisError::OperationError(format!("unexpected ping reply: {}", reply)))
        }
    }
}

impl fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisClient")
            .field("connection_info", self.client.get_connection_info())
            .finish()
    }
}

fn resolve_url(config: &StoreConfig) -> String {
    match std::env::var(REDIS_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => url,
        _ => config.redis_url.clone(),
    }
}
