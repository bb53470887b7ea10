//! 对象存储访问
//!
//! MMDB 文件存放在一个 "bucket" 中，按路径取回原始字节：
//! - file: bucket 是本地目录
//! - http: bucket 是 HTTP(S) base URL

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

use crate::config::StorageConfig;
use crate::errors::{GeoError, Result};

mod file;
mod http;

pub use file::FileObjectStore;
pub use http::HttpObjectStore;

/// 对象存储访问接口
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// 读取对象，不存在时返回 `Ok(None)`
    async fn get(&self, path: &str) -> Result<Option<Bytes>>;

    /// 后端名称（用于日志）
    fn name(&self) -> &'static str;
}

pub struct ObjectStoreFactory;

impl ObjectStoreFactory {
    pub fn create(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
        let store: Arc<dyn ObjectStore> = match config.storage_type.as_str() {
            "file" => Arc::new(FileObjectStore::new(&config.bucket, config.max_object_size)),
            "http" => Arc::new(HttpObjectStore::new(
                &config.bucket,
                config.timeout_secs,
                config.max_object_size,
            )?),
            other => {
                return Err(GeoError::config(format!(
                    "Unknown storage type: '{}'. Valid: file, http",
                    other
                )));
            }
        };

        info!("Using object store: {} ({})", store.name(), config.bucket);
        Ok(store)
    }
}
