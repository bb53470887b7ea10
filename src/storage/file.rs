use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, trace};

use super::ObjectStore;
use crate::errors::{GeoError, Result};

/// 本地目录作为 bucket
pub struct FileObjectStore {
    root: PathBuf,
    max_object_size: u64,
}

impl FileObjectStore {
    pub fn new(root: impl Into<PathBuf>, max_object_size: u64) -> Self {
        Self {
            root: root.into(),
            max_object_size,
        }
    }

    /// 只允许 bucket 内的相对路径
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(GeoError::storage_unavailable(format!(
                "Invalid object path: '{}'",
                path
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for FileObjectStore {
    async fn get(&self, path: &str) -> Result<Option<Bytes>> {
        let full_path = self.resolve(path)?;
        trace!("Reading object from {}", full_path.display());

        let metadata = match tokio::fs::metadata(&full_path).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Object not found: {}", full_path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(GeoError::storage_unavailable(format!(
                    "Failed to stat {}: {}",
                    full_path.display(),
                    e
                )));
            }
        };

        if !metadata.is_file() {
            return Ok(None);
        }
        if metadata.len() > self.max_object_size {
            return Err(GeoError::storage_unavailable(format!(
                "Object {} is {} bytes, limit is {}",
                path,
                metadata.len(),
                self.max_object_size
            )));
        }

        let data = tokio::fs::read(&full_path).await.map_err(|e| {
            GeoError::storage_unavailable(format!("Failed to read {}: {}", full_path.display(), e))
        })?;
        Ok(Some(Bytes::from(data)))
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
