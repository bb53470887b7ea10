use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::Expiry;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::cache::{CacheEntry, EdgeCache};
use crate::config::CacheConfig;
use crate::errors::Result;

/// 按条目自带的 TTL 过期，重复写入时重置
struct EntryExpiry;

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(Duration::from_secs(value.ttl_seconds))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(Duration::from_secs(value.ttl_seconds))
    }
}

/// 进程内边缘缓存
///
/// 容量按 payload 字节计，一份 MMDB 通常几十 MB，结果条目只有几百字节
pub struct MokaEdgeCache {
    inner: Cache<String, CacheEntry>,
}

impl MokaEdgeCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_max_bytes(config.memory.max_bytes)
    }

    pub fn with_max_bytes(max_bytes: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_bytes)
            .weigher(|_key: &String, entry: &CacheEntry| -> u32 {
                u32::try_from(entry.payload.len()).unwrap_or(u32::MAX)
            })
            .expire_after(EntryExpiry)
            .build();

        debug!("MokaEdgeCache initialized with max capacity: {} bytes", max_bytes);
        Self { inner }
    }
}

#[async_trait]
impl EdgeCache for MokaEdgeCache {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let entry = self.inner.get(key).await;
        trace!("MokaEdgeCache.get {} -> hit={}", key, entry.is_some());
        Ok(entry)
    }

    async fn put(&self, entry: CacheEntry) -> Result<()> {
        trace!(
            "MokaEdgeCache.put {} ({} bytes, {})",
            entry.key,
            entry.payload.len(),
            entry.cache_control()
        );
        self.inner.insert(entry.key.clone(), entry).await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
