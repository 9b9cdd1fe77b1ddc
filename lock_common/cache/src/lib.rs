//! Redis connection handle shared by every lock in the process

pub mod client;
pub mod error;

pub use client::RedisClient;
pub use error::RedisError;
