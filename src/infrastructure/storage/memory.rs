//! In-memory gateway used by tests in place of a real bucket.

use super::{StorageError, StorageGateway, StorageResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<Mutex<HashMap<String, (Vec<u8>, String)>>>,
    fail_puts: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent `put` fails with `UploadFailed`.
    pub fn failing() -> Self {
        let storage = Self::new();
        storage.fail_puts.store(true, Ordering::SeqCst);
        storage
    }

    pub fn object(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Resolve a URL produced by `presigned_get` back to the object bytes.
    pub fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        let key = url.strip_prefix("memory://")?.split('?').next()?;
        self.object(key).map(|(bytes, _)| bytes)
    }
}

#[async_trait]
impl StorageGateway for MemoryStorage {
    async fn put(&self, key: &str, source: &Path, content_type: &str) -> StorageResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("bucket unavailable".to_string()));
        }
        let bytes = tokio::fs::read(source).await?;
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (bytes, content_type.to_string()));
        Ok(())
    }

    async fn presigned_get(&self, key: &str, ttl: Duration) -> StorageResult<String> {
        if !self.objects.lock().unwrap().contains_key(key) {
            return Err(StorageError::NotFound(key.to_string()));
        }
        Ok(format!("memory://{}?expires={}", key, ttl.as_secs()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
