use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, aio::MultiplexedConnection};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, trace};

use crate::cache::{CacheEntry, EdgeCache};
use crate::config::RedisConfig;
use crate::errors::{GeoError, Result};

const FIELD_PAYLOAD: &str = "payload";
const FIELD_CONTENT_TYPE: &str = "content_type";
const FIELD_TTL: &str = "ttl_seconds";
const FIELD_LAST_MODIFIED: &str = "last_modified";

/// Redis 边缘缓存
///
/// 每个条目存为一个 hash，过期交给 Redis 的 EXPIRE
pub struct RedisEdgeCache {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    key_prefix: String,
}

impl RedisEdgeCache {
    pub async fn new(config: &RedisConfig) -> Result<Self> {
        debug!("RedisEdgeCache created with prefix: '{}'", config.key_prefix);

        let client = redis::Client::open(config.url.clone()).map_err(|e| {
            GeoError::config(format!("Invalid Redis URL '{}': {}", config.url, e))
        })?;

        let cache = Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            key_prefix: config.key_prefix.clone(),
        };

        // 启动时测试连接
        let mut conn = cache.get_connection().await.map_err(|e| {
            error!(
                "Failed to connect to Redis server: {}. Check Redis server status and URL: {}",
                e, config.url
            );
            GeoError::cache_unavailable(format!("Redis connection failed: {e}"))
        })?;
        let response: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| GeoError::cache_unavailable(format!("Redis ping failed: {e}")))?;
        debug!("Redis connection test successful: {}", response);

        Ok(cache)
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> std::result::Result<MultiplexedConnection, redis::RedisError> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用）
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    fn decode_entry(key: &str, mut fields: HashMap<String, Vec<u8>>) -> Result<CacheEntry> {
        let payload = fields
            .remove(FIELD_PAYLOAD)
            .ok_or_else(|| GeoError::serialization(format!("Missing payload for key '{}'", key)))?;

        let text_field = |fields: &HashMap<String, Vec<u8>>, name: &str| {
            fields
                .get(name)
                .map(|v| String::from_utf8_lossy(v).into_owned())
                .unwrap_or_default()
        };

        let content_type = text_field(&fields, FIELD_CONTENT_TYPE);
        let ttl_seconds = text_field(&fields, FIELD_TTL).parse().unwrap_or_default();
        let last_modified = DateTime::parse_from_rfc3339(&text_field(&fields, FIELD_LAST_MODIFIED))
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(CacheEntry {
            key: key.to_string(),
            payload: Bytes::from(payload),
            content_type,
            ttl_seconds,
            last_modified,
        })
    }
}

#[async_trait]
impl EdgeCache for RedisEdgeCache {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let redis_key = self.make_key(key);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                self.reset_connection().await;
                return Err(e.into());
            }
        };

        let fields: HashMap<String, Vec<u8>> = match conn.hgetall(&redis_key).await {
            Ok(fields) => fields,
            Err(e) => {
                // 连接可能已断开，重置连接
                self.reset_connection().await;
                return Err(e.into());
            }
        };

        if fields.is_empty() {
            trace!("Key not found in cache: {}", key);
            return Ok(None);
        }

        let entry = Self::decode_entry(key, fields)?;
        trace!("Successfully retrieved key: {}", key);
        Ok(Some(entry))
    }

    async fn put(&self, entry: CacheEntry) -> Result<()> {
        let redis_key = self.make_key(&entry.key);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                self.reset_connection().await;
                return Err(e.into());
            }
        };

        let fields: [(&str, Vec<u8>); 4] = [
            (FIELD_PAYLOAD, entry.payload.to_vec()),
            (FIELD_CONTENT_TYPE, entry.content_type.clone().into_bytes()),
            (FIELD_TTL, entry.ttl_seconds.to_string().into_bytes()),
            (FIELD_LAST_MODIFIED, entry.last_modified.to_rfc3339().into_bytes()),
        ];
        let ttl = i64::try_from(entry.ttl_seconds).unwrap_or(i64::MAX);

        let result: redis::RedisResult<()> = redis::pipe()
            .atomic()
            .hset_multiple(&redis_key, &fields)
            .ignore()
            .expire(&redis_key, ttl)
            .ignore()
            .query_async(&mut conn)
            .await;

        match result {
            Ok(()) => {
                trace!("Successfully inserted key into cache: {}", entry.key);
                Ok(())
            }
            Err(e) => {
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
