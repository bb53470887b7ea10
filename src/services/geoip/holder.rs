//! 数据库 Reader 持有者
//!
//! 每个进程只解析一次 MMDB。冷启动时多个请求可能同时构造 Reader，
//! 只有第一个发布的会被保留，其余调用方拿到的也是它。构造失败不保留
//! 任何状态，下一个请求会重试。

use std::sync::Arc;

use arc_swap::{ArcSwapOption, Guard};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use super::database::{DatabaseOpener, GeoDatabase};
use crate::cache::DatabaseSource;
use crate::errors::{GeoError, Result};

/// 已解析的数据库及其加载时间
pub struct ReaderHandle {
    database: Box<dyn GeoDatabase>,
    loaded_at: DateTime<Utc>,
}

impl ReaderHandle {
    pub fn new(database: Box<dyn GeoDatabase>) -> Self {
        Self {
            database,
            loaded_at: Utc::now(),
        }
    }

    pub fn database(&self) -> &dyn GeoDatabase {
        self.database.as_ref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

pub struct ReaderHolder {
    source: DatabaseSource,
    opener: Arc<dyn DatabaseOpener>,
    slot: ArcSwapOption<ReaderHandle>,
}

impl ReaderHolder {
    pub fn new(source: DatabaseSource, opener: Arc<dyn DatabaseOpener>) -> Self {
        Self {
            source,
            opener,
            slot: ArcSwapOption::empty(),
        }
    }

    /// 返回当前 Reader，尚未加载时获取字节并构造
    pub async fn ensure(&self) -> Result<Arc<ReaderHandle>> {
        if let Some(handle) = self.slot.load_full() {
            return Ok(handle);
        }

        info!("Initializing MMDB Reader...");
        let handle = match self.build().await {
            Ok(handle) => Arc::new(handle),
            Err(e) => {
                error!("Error creating MMDB Reader instance: {}", e);
                return Err(GeoError::reader_init(format!(
                    "MMDB Reader initialization failed: {}",
                    e
                )));
            }
        };

        // 只在槽位为空时发布，已发布的 Reader 不会被替换
        let previous = self
            .slot
            .compare_and_swap(&None::<Arc<ReaderHandle>>, Some(Arc::clone(&handle)));
        if let Some(existing) = Guard::into_inner(previous) {
            debug!(
                "Discarding duplicate MMDB Reader, keeping the one loaded at {}",
                existing.loaded_at()
            );
            return Ok(existing);
        }

        info!(
            "MMDB Reader instance created successfully ({})",
            handle.database().database_type()
        );
        Ok(handle)
    }

    async fn build(&self) -> Result<ReaderHandle> {
        let data = self.source.get_database_bytes().await?;
        debug!(
            "Opening MMDB from {} ({} bytes)",
            self.source.mmdb_path(),
            data.len()
        );
        let database = self.opener.open(data)?;
        Ok(ReaderHandle::new(database))
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.load().is_some()
    }
}
