use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::errors::Result;

/// 边缘缓存中的一条记录
///
/// 和 HTTP 缓存语义对应：payload 即响应体，ttl 对应 `Cache-Control: max-age`
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    pub payload: Bytes,
    pub content_type: String,
    pub ttl_seconds: u64,
    pub last_modified: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(
        key: impl Into<String>,
        payload: Bytes,
        content_type: impl Into<String>,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            key: key.into(),
            payload,
            content_type: content_type.into(),
            ttl_seconds,
            last_modified: Utc::now(),
        }
    }

    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.ttl_seconds)
    }
}

/// 边缘缓存后端
///
/// 所有实现都允许失败，调用方（blob / result 缓存层）负责记录日志并降级为未命中
#[async_trait]
pub trait EdgeCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

    async fn put(&self, entry: CacheEntry) -> Result<()>;

    /// 后端名称（用于日志）
    fn name(&self) -> &'static str;
}
