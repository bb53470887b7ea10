//! MMDB 原始字节缓存
//!
//! 先查边缘缓存，未命中时从对象存储下载并回填。
//! 缓存读写失败只记日志，不影响数据库获取

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, error, info, warn};

use super::keys::{CacheKind, cache_key};
use super::{CacheEntry, EdgeCache};
use crate::errors::{GeoError, Result};
use crate::storage::ObjectStore;

/// 数据库在缓存中的固定标识
pub const MMDB_CACHE_ID: &str = "geolite2-city";

pub const MMDB_CONTENT_TYPE: &str = "application/octet-stream";

pub struct DatabaseSource {
    cache: Arc<dyn EdgeCache>,
    store: Arc<dyn ObjectStore>,
    mmdb_path: String,
    ttl_seconds: u64,
}

impl DatabaseSource {
    pub fn new(
        cache: Arc<dyn EdgeCache>,
        store: Arc<dyn ObjectStore>,
        mmdb_path: impl Into<String>,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            cache,
            store,
            mmdb_path: mmdb_path.into(),
            ttl_seconds,
        }
    }

    pub fn mmdb_path(&self) -> &str {
        &self.mmdb_path
    }

    /// 获取数据库原始字节
    pub async fn get_database_bytes(&self) -> Result<Bytes> {
        let key = cache_key(CacheKind::Mmdb, MMDB_CACHE_ID);

        match self.cache.get(&key).await {
            Ok(Some(entry)) => {
                debug!("Using cached MMDB data ({} bytes)", entry.payload.len());
                return Ok(entry.payload);
            }
            Ok(None) => {}
            Err(e) => warn!("Error accessing MMDB cache: {}", e),
        }

        info!("Cache miss, fetching MMDB from {} store", self.store.name());
        let data = self.fetch_from_store().await?;

        let entry = CacheEntry::new(key, data.clone(), MMDB_CONTENT_TYPE, self.ttl_seconds);
        match self.cache.put(entry).await {
            Ok(()) => info!("MMDB data cached successfully"),
            Err(e) => warn!("Error caching MMDB data: {}", e),
        }

        Ok(data)
    }

    async fn fetch_from_store(&self) -> Result<Bytes> {
        match self.store.get(&self.mmdb_path).await {
            Ok(Some(data)) => Ok(data),
            Ok(None) => {
                error!("MMDB file not found in bucket: {}", self.mmdb_path);
                Err(GeoError::storage_unavailable(format!(
                    "MMDB file not found in bucket: {}",
                    self.mmdb_path
                )))
            }
            Err(e) => {
                error!("Error fetching MMDB from {} store: {}", self.store.name(), e);
                match e {
                    GeoError::StorageUnavailable(_) => Err(e),
                    other => Err(GeoError::storage_unavailable(other.message())),
                }
            }
        }
    }
}
