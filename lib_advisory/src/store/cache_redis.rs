//! # Redis Cache Implementation
//!
//! An asynchronous wrapper for the Redis key-value operations the store
//! uses as its write-through persistence layer.

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisResult};

/// A handler for Redis cache interactions.
pub struct CacheHandler {
    /// Managed connection; reconnects transparently.
    manager: ConnectionManager,
}

impl CacheHandler {
    /// Connects to Redis from a connection string.
    ///
    /// # Arguments
    /// * `url` - The redis URL (e.g., "redis://127.0.0.1/").
    pub async fn connect(url: &str) -> RedisResult<Self> {
        let client = Client::open(url)?;
        let manager = client.get_connection_manager().await?;
        Ok(Self { manager })
    }

    /// Stores a string value in the cache.
    pub async fn set_string(&self, key: &str, value: &str) -> RedisResult<()> {
        let mut conn = self.manager.clone();
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    /// Fetches a string value, `None` when the key is absent.
    pub async fn get_string(&self, key: &str) -> RedisResult<Option<String>> {
        let mut conn = self.manager.clone();
        conn.get(key).await
    }

    /// Removes a key.
    pub async fn delete(&self, key: &str) -> RedisResult<()> {
        let mut conn = self.manager.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }
}
