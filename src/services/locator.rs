//! 查询管线
//!
//! 结果缓存 → Reader → 查询 → 规范化 → 回填结果缓存

use std::sync::Arc;

use tracing::{debug, trace};

use super::geoip::{LookupOutcome, ReaderHolder, lookup_and_normalize};
use crate::cache::ResultCache;
use crate::errors::Result;
use crate::utils::IpAddress;

pub struct GeoLocator {
    holder: Arc<ReaderHolder>,
    results: ResultCache,
}

impl GeoLocator {
    pub fn new(holder: Arc<ReaderHolder>, results: ResultCache) -> Self {
        Self { holder, results }
    }

    pub fn holder(&self) -> &Arc<ReaderHolder> {
        &self.holder
    }

    /// 查询单个 IP
    ///
    /// 只有 Reader 初始化失败会返回错误；数据库未覆盖或查询出错都体现在
    /// [`LookupOutcome::Error`] 中
    pub async fn locate(&self, ip: &IpAddress) -> Result<LookupOutcome> {
        if let Some(location) = self.results.get(ip).await {
            return Ok(LookupOutcome::Found(location));
        }

        trace!("Result cache miss for IP: {}", ip);
        let handle = self.holder.ensure().await?;
        let outcome = lookup_and_normalize(handle.database(), ip);

        match &outcome {
            LookupOutcome::Found(location) => self.results.put(ip, location).await,
            LookupOutcome::Error(result) => {
                debug!("Not caching error result for {}: {}", ip, result.error)
            }
        }

        Ok(outcome)
    }
}
