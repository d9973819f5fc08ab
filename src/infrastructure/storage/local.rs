use super::{StorageError, StorageGateway, StorageResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Route prefix under which the local directory is served.
pub const PUBLIC_PREFIX: &str = "processed";

/// Writes objects into a directory this process serves statically.
/// URLs carry no signature, so the ttl is not enforced.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    root: PathBuf,
    base_url: Url,
}

impl LocalStorage {
    pub async fn new(root: impl Into<PathBuf>, public_base_url: &str) -> anyhow::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;

        let base_url = Url::parse(&format!("{}/", public_base_url.trim_end_matches('/')))?
            .join(&format!("{}/", PUBLIC_PREFIX))?;

        info!(root = %root.display(), "✅ Local storage configured");
        Ok(Self { root, base_url })
    }

    /// Objects are flattened to their file name so every key maps inside `root`.
    fn file_name(key: &str) -> StorageResult<&str> {
        Path::new(key)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.starts_with('.'))
            .ok_or_else(|| StorageError::InvalidKey(key.to_string()))
    }
}

#[async_trait]
impl StorageGateway for LocalStorage {
    async fn put(&self, key: &str, source: &Path, _content_type: &str) -> StorageResult<()> {
        let target = self.root.join(Self::file_name(key)?);
        debug!(key, target = %target.display(), "Copying object");
        tokio::fs::copy(source, &target)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        Ok(())
    }

    async fn presigned_get(&self, key: &str, _ttl: Duration) -> StorageResult<String> {
        let name = Self::file_name(key)?;
        if !tokio::fs::try_exists(self.root.join(name)).await? {
            return Err(StorageError::NotFound(key.to_string()));
        }

        self.base_url
            .join(name)
            .map(|u| u.to_string())
            .map_err(|e| StorageError::PresignFailed(e.to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
