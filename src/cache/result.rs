//! 单个 IP 查询结果的缓存
//!
//! 只缓存成功的查询结果（[`NormalizedLocation`]），错误结果无法写入

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use super::keys::{CacheKind, cache_key};
use super::{CacheEntry, EdgeCache};
use crate::services::geoip::NormalizedLocation;
use crate::utils::IpAddress;

pub const RESULT_CONTENT_TYPE: &str = "application/json";

#[derive(Clone)]
pub struct ResultCache {
    cache: Arc<dyn EdgeCache>,
    ttl_seconds: u64,
}

impl ResultCache {
    pub fn new(cache: Arc<dyn EdgeCache>, ttl_seconds: u64) -> Self {
        Self { cache, ttl_seconds }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// 读取缓存结果，任何错误都视为未命中
    pub async fn get(&self, ip: &IpAddress) -> Option<NormalizedLocation> {
        let key = cache_key(CacheKind::Ip, ip.as_str());

        let entry = match self.cache.get(&key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                warn!("Error accessing IP cache: {}", e);
                return None;
            }
        };

        match serde_json::from_slice::<NormalizedLocation>(&entry.payload) {
            Ok(location) => {
                debug!("Using cached result for IP: {}", ip);
                Some(location)
            }
            Err(e) => {
                warn!("Discarding undecodable cached result for IP {}: {}", ip, e);
                None
            }
        }
    }

    /// 写入查询结果，失败只记录日志
    pub async fn put(&self, ip: &IpAddress, location: &NormalizedLocation) {
        let payload = match serde_json::to_vec(location) {
            Ok(payload) => Bytes::from(payload),
            Err(e) => {
                warn!("Error serializing result for IP {}: {}", ip, e);
                return;
            }
        };

        let entry = CacheEntry::new(
            cache_key(CacheKind::Ip, ip.as_str()),
            payload,
            RESULT_CONTENT_TYPE,
            self.ttl_seconds,
        );

        match self.cache.put(entry).await {
            Ok(()) => debug!("Cached result for IP: {}", ip),
            Err(e) => warn!("Error caching IP result: {}", e),
        }
    }
}
