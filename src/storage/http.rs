//! HTTP(S) bucket
//!
//! ureq 是同步客户端，请求放在 spawn_blocking 中执行

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, trace, warn};
use ureq::Agent;

use super::ObjectStore;
use crate::errors::{GeoError, Result};

pub struct HttpObjectStore {
    base_url: String,
    agent: Agent,
    max_object_size: u64,
}

impl HttpObjectStore {
    pub fn new(base_url: &str, timeout_secs: u64, max_object_size: u64) -> Result<Self> {
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(GeoError::config(format!(
                "HTTP bucket must be an http:// or https:// URL, got '{}'",
                base_url
            )));
        }

        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .build()
            .into();

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
            max_object_size,
        })
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn fetch_sync(agent: Agent, url: String, limit: u64) -> Result<Option<Bytes>> {
        let response = match agent.get(&url).call() {
            Ok(r) => r,
            Err(ureq::Error::StatusCode(404)) => {
                debug!("Object not found at {}", url);
                return Ok(None);
            }
            Err(e) => {
                warn!("Object request to \"{}\" failed: {}", url, e);
                return Err(GeoError::storage_unavailable(format!(
                    "Failed to fetch {}: {}",
                    url, e
                )));
            }
        };

        let data = response
            .into_body()
            .with_config()
            .limit(limit)
            .read_to_vec()
            .map_err(|e| {
                GeoError::storage_unavailable(format!("Failed to read body from {}: {}", url, e))
            })?;

        trace!("Fetched {} bytes from {}", data.len(), url);
        Ok(Some(Bytes::from(data)))
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn get(&self, path: &str) -> Result<Option<Bytes>> {
        let url = self.object_url(path);
        let agent = self.agent.clone();
        let limit = self.max_object_size;

        tokio::task::spawn_blocking(move || Self::fetch_sync(agent, url, limit))
            .await
            .map_err(|e| GeoError::storage_unavailable(format!("Object fetch task failed: {}", e)))?
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
