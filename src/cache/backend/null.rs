use async_trait::async_trait;
use tracing::trace;

use crate::cache::{CacheEntry, EdgeCache};
use crate::errors::Result;

/// 不缓存任何内容，每次都未命中
pub struct NullEdgeCache;

impl NullEdgeCache {
    pub fn new() -> Self {
        trace!("Using NullEdgeCache: every lookup goes to the backing source");
        NullEdgeCache
    }
}

impl Default for NullEdgeCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EdgeCache for NullEdgeCache {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        trace!("NullEdgeCache.get called for key: {}", key);
        Ok(None)
    }

    async fn put(&self, entry: CacheEntry) -> Result<()> {
        trace!("NullEdgeCache.put called for key: {}", entry.key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
