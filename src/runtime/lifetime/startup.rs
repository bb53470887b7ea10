use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cache::{DatabaseSource, EdgeCache, EdgeCacheFactory, ResultCache};
use crate::config::StaticConfig;
use crate::services::geoip::{DatabaseOpener, MaxMindOpener, ReaderHolder};
use crate::services::GeoLocator;
use crate::storage::{ObjectStore, ObjectStoreFactory};

/// 启动后所有请求共享的组件
pub struct StartupContext {
    pub locator: Arc<GeoLocator>,
}

/// 用给定的缓存、存储和数据库实现组装查询管线
///
/// blob 缓存和结果缓存共用同一个后端，key 空间和 TTL 各自独立
pub fn build_locator(
    config: &StaticConfig,
    cache: Arc<dyn EdgeCache>,
    store: Arc<dyn ObjectStore>,
    opener: Arc<dyn DatabaseOpener>,
) -> Arc<GeoLocator> {
    let source = DatabaseSource::new(
        Arc::clone(&cache),
        store,
        config.storage.mmdb_path.clone(),
        config.cache.blob_ttl,
    );
    let holder = Arc::new(ReaderHolder::new(source, opener));
    let results = ResultCache::new(cache, config.cache.result_ttl);

    Arc::new(GeoLocator::new(holder, results))
}

/// 按配置创建后端并组装查询管线
///
/// MMDB 不在这里加载，第一个请求到达时才会获取并解析
pub async fn prepare_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let cache = EdgeCacheFactory::create(&config.cache)
        .await
        .context("Failed to create edge cache backend")?;
    let store =
        ObjectStoreFactory::create(&config.storage).context("Failed to create object store")?;

    let (cache_backend, store_backend) = (cache.name(), store.name());
    let locator = build_locator(config, cache, store, Arc::new(MaxMindOpener));

    info!(
        "Pre-startup completed in {} ms (cache: {}, store: {}, mmdb: {})",
        start_time.elapsed().as_millis(),
        cache_backend,
        store_backend,
        config.storage.mmdb_path
    );

    Ok(StartupContext { locator })
}
