use crate::errors::StoreError;
use crate::store::IndexStore;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tokio::time::timeout;

/// Store backed by a Redis server, the usual home of deployed index
/// documents and their `<app>:current` pointers.
///
/// The connection is re-established in the background after it drops. The
/// read that observed the drop fails; later reads use the new connection.
pub struct RedisStore {
    conn: ConnectionManager,
    read_timeout: Option<Duration>,
}

impl RedisStore {
    pub async fn connect(url: &str, read_timeout: Option<Duration>) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;

        tracing::info!(url, "Connected to redis");

        Ok(RedisStore {
            conn,
            read_timeout,
        })
    }
}

#[async_trait]
impl IndexStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        // Clones share the managed connection
        let mut conn = self.conn.clone();
        let read = conn.get::<&str, Option<String>>(key);

        match self.read_timeout {
            Some(duration) => timeout(duration, read)
                .await
                .map_err(|_| StoreError::Timeout(key.to_string()))?
                .map_err(StoreError::from),
            None => Ok(read.await?),
        }
    }
}
