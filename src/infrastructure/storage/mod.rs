//! Object storage gateway.
//!
//! The job executor only needs two things from a backend: write an object under
//! a key, and hand out a time-limited URL to read it back. Re-putting a key
//! overwrites whatever was there before.

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub mod local;
#[cfg(test)]
pub mod memory;
pub mod s3;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Presign failed: {0}")]
    PresignFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Upload the file at `source` under `key`. No retries at this layer.
    async fn put(&self, key: &str, source: &Path, content_type: &str) -> StorageResult<()>;

    /// Produce a credential-free GET URL valid for `ttl`.
    async fn presigned_get(&self, key: &str, ttl: Duration) -> StorageResult<String>;

    fn backend_name(&self) -> &'static str;
}
