//! In-memory storage backend.
//!
//! Objects are held in a `tokio::sync::RwLock<HashMap<...>>`.  Nothing is
//! persisted; the backend is meant for tests and throwaway local runs.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use super::backend::{BackendFuture, ObjectMetadata, StorageBackend, StoredObject};

/// A single stored entry.
struct Entry {
    data: Bytes,
    last_modified: DateTime<Utc>,
}

/// In-memory storage backend.
#[derive(Default)]
pub struct MemoryBackend {
    /// key -> entry.
    objects: tokio::sync::RwLock<HashMap<String, Entry>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the backend holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    /// Compute the SHA-256 content hash for a byte slice.
    fn compute_content_hash(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }
}

impl StorageBackend for MemoryBackend {
    fn put(&self, key: &str, data: Bytes) -> BackendFuture<'_, String> {
        let key = key.to_string();
        Box::pin(async move {
            let hash = Self::compute_content_hash(&data);
            let mut objects = self.objects.write().await;
            objects.insert(
                key,
                Entry {
                    data,
                    last_modified: Utc::now(),
                },
            );
            Ok(hash)
        })
    }

    fn get(&self, key: &str) -> BackendFuture<'_, StoredObject> {
        let key = key.to_string();
        Box::pin(async move {
            let objects = self.objects.read().await;
            match objects.get(&key) {
                Some(entry) => Ok(StoredObject {
                    data: entry.data.clone(),
                    content_hash: Self::compute_content_hash(&entry.data),
                }),
                None => anyhow::bail!("Object not found at key: {key}"),
            }
        })
    }

    fn delete(&self, key: &str) -> BackendFuture<'_, ()> {
        let key = key.to_string();
        Box::pin(async move {
            self.objects.write().await.remove(&key);
            Ok(())
        })
    }

    fn exists(&self, key: &str) -> BackendFuture<'_, bool> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.objects.read().await.contains_key(&key)) })
    }

    fn list(&self, prefix: &str) -> BackendFuture<'_, Vec<String>> {
        let prefix = prefix.to_string();
        Box::pin(async move {
            let objects = self.objects.read().await;
            let mut keys: Vec<String> = objects
                .keys()
                .filter(|k| k.starts_with(&prefix))
                .cloned()
                .collect();
            keys.sort();
            Ok(keys)
        })
    }

    fn metadata(&self, key: &str) -> BackendFuture<'_, ObjectMetadata> {
        let key = key.to_string();
        Box::pin(async move {
            let objects = self.objects.read().await;
            match objects.get(&key) {
                Some(entry) => Ok(ObjectMetadata {
                    size: entry.data.len() as u64,
                    content_type: None,
                    last_modified: Some(entry.last_modified),
                }),
                None => anyhow::bail!("Object not found at key: {key}"),
            }
        })
    }
}
