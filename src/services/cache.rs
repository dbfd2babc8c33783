//! Ranking cache.
//!
//! Holds the un-annotated compatibility shortlist of each `(user, limit)`
//! pair. Every accepted quiz submission drops all of them, since one new
//! answer vector can reorder anyone's shortlist. Like statuses stay out of
//! here and are always read from the like store.

use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::UserId;

/// Failure to read or write a cached shortlist
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Two-tier store for [`RankResult`](crate::core::RankResult) shortlists
///
/// L1 is a moka cache local to this process. L2 is Redis, shared by every
/// instance. Both tiers expire entries after `ttl_secs`.
pub struct CacheManager {
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Connect to Redis and size the local tier
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            l1_cache,
            ttl_secs,
        })
    }

    /// Look up a shortlist, filling L1 on an L2 hit
    ///
    /// Absent keys come back as [`CacheError::CacheMiss`].
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("Ranking {} served from local tier", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let mut conn = self.redis.lock().await;
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut *conn)
            .await?;
        drop(conn);

        if let Some(json) = value {
            tracing::trace!("Ranking {} served from Redis", key);

            self.l1_cache
                .insert(key.to_string(), json.as_bytes().to_vec())
                .await;

            return Ok(serde_json::from_str(&json)?);
        }

        tracing::trace!("Ranking {} not cached", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Store a freshly computed shortlist in both tiers
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        self.l1_cache
            .insert(key.to_string(), json.as_bytes().to_vec())
            .await;

        let mut conn = self.redis.lock().await;
        redis::cmd("SETEX")
            .arg(key)
            .arg(self.ttl_secs)
            .arg(json)
            .query_async::<()>(&mut *conn)
            .await?;
        drop(conn);

        tracing::trace!("Cached ranking {} for {}s", key, self.ttl_secs);
        Ok(())
    }

    /// Drop every Redis key matching `pattern`
    ///
    /// The local tier is cleared wholesale, and only on this instance.
    pub async fn invalidate_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        // L1 has no pattern lookup
        self.l1_cache.invalidate_all();

        let mut conn = self.redis.lock().await;
        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(pattern)
            .query_async(&mut *conn)
            .await?;

        let dropped = keys.len();
        if !keys.is_empty() {
            redis::cmd("DEL")
                .arg(keys)
                .query_async::<()>(&mut *conn)
                .await?;
        }

        tracing::debug!("Dropped {} cached rankings matching {}", dropped, pattern);
        Ok(())
    }
}

/// Key layout: `ranking:{user}:{limit}`
pub struct CacheKey;

impl CacheKey {
    /// Ranked shortlist of `limit` candidates for a user
    pub fn ranking(user_id: &UserId, limit: usize) -> String {
        format!("ranking:{}:{}", user_id, limit)
    }

    /// Matches every cached ranking
    pub fn all_rankings() -> &'static str {
        "ranking:*"
    }
}
