//! Redis cache service for screening results

use std::env;

use redis::{AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};

// Environment variable names
const ENV_REDIS_HOST: &str = "TRIAGE_REDIS_HOST";
const ENV_REDIS_PORT: &str = "TRIAGE_REDIS_PORT";
const ENV_REDIS_PASSWORD: &str = "TRIAGE_REDIS_PASSWORD";
const ENV_REDIS_DB: &str = "TRIAGE_REDIS_DB";
const ENV_CACHE_TTL: &str = "TRIAGE_CACHE_TTL";

// Default values
const DEFAULT_REDIS_HOST: &str = "127.0.0.1";
const DEFAULT_REDIS_PORT: &str = "6379";
const DEFAULT_REDIS_DB: &str = "0";

// Screening results are stable for a given paper/prompt/model, keep long
const DEFAULT_TTL_SECONDS: u64 = 30 * 24 * 60 * 60; // 30 days

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Cache miss for key: {0}")]
    Miss(String),
}

const PREFIX_SCREENING: &str = "screening:";

/// Redis-based cache for screening results
#[derive(Clone)]
pub struct ScreeningCache {
    client: Client,
    ttl_seconds: u64,
}

impl ScreeningCache {
    /// Create a new cache instance and verify connection
    ///
    /// Configuration via environment variables:
    /// - `TRIAGE_REDIS_HOST` - Redis host (default: 127.0.0.1)
    /// - `TRIAGE_REDIS_PORT` - Redis port (default: 6379)
    /// - `TRIAGE_REDIS_PASSWORD` - Redis password (default: none)
    /// - `TRIAGE_REDIS_DB` - Redis database number (default: 0)
    /// - `TRIAGE_CACHE_TTL` - Cache TTL in seconds (default: 30 days)
    pub async fn new() -> Result<Self, CacheError> {
        let host = env::var(ENV_REDIS_HOST).unwrap_or_else(|_| DEFAULT_REDIS_HOST.to_string());
        let port = env::var(ENV_REDIS_PORT).unwrap_or_else(|_| DEFAULT_REDIS_PORT.to_string());
        let password = env::var(ENV_REDIS_PASSWORD).ok();
        let db = env::var(ENV_REDIS_DB).unwrap_or_else(|_| DEFAULT_REDIS_DB.to_string());

        let ttl_seconds = env::var(ENV_CACHE_TTL)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TTL_SECONDS);

        // Build Redis URL: redis://[password@]host:port/db
        let redis_url = match password {
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        tracing::debug!(host = %host, port = %port, db = %db, "Connecting to Redis");

        let client = Client::open(redis_url)?;

        // Test the connection by pinging Redis
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        tracing::info!(host = %host, port = %port, "Redis connection established");

        Ok(Self {
            client,
            ttl_seconds,
        })
    }

    /// Get a cached screening result by composite key hash
    pub async fn get_screening<T: DeserializeOwned>(&self, key_hash: &str) -> Result<T, CacheError> {
        let full_key = format!("{}{}", PREFIX_SCREENING, key_hash);
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let data: Option<String> = conn.get(&full_key).await?;

        match data {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| CacheError::Serialization(e.to_string()))
            }
            None => Err(CacheError::Miss(key_hash.to_string())),
        }
    }

    /// Cache a screening result by composite key hash
    pub async fn set_screening<T: Serialize>(
        &self,
        key_hash: &str,
        data: &T,
    ) -> Result<(), CacheError> {
        let full_key = format!("{}{}", PREFIX_SCREENING, key_hash);
        let json =
            serde_json::to_string(data).map_err(|e| CacheError::Serialization(e.to_string()))?;

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(&full_key, json, self.ttl_seconds).await?;

        tracing::debug!(key = %full_key, ttl = self.ttl_seconds, "Cached screening result");
        Ok(())
    }
}
