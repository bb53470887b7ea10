//! 边缘缓存后端
//!
//! - memory: moka，按条目 TTL 过期
//! - redis: 共享缓存，多实例之间复用 MMDB 和查询结果
//! - null: 关闭缓存

mod moka;
mod null;
mod redis;

use std::sync::Arc;

use tracing::info;

pub use self::moka::MokaEdgeCache;
pub use self::null::NullEdgeCache;
pub use self::redis::RedisEdgeCache;

use crate::cache::EdgeCache;
use crate::config::CacheConfig;
use crate::errors::{GeoError, Result};

pub struct EdgeCacheFactory;

impl EdgeCacheFactory {
    pub async fn create(config: &CacheConfig) -> Result<Arc<dyn EdgeCache>> {
        let cache: Arc<dyn EdgeCache> = match config.cache_type.as_str() {
            "memory" => Arc::new(MokaEdgeCache::new(config)),
            "redis" => Arc::new(RedisEdgeCache::new(&config.redis).await?),
            "null" | "none" => Arc::new(NullEdgeCache::new()),
            other => {
                return Err(GeoError::config(format!(
                    "Unknown cache type: '{}'. Valid: memory, redis, null",
                    other
                )));
            }
        };

        info!("Using edge cache backend: {}", cache.name());
        Ok(cache)
    }
}
