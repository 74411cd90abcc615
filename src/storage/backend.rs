//! Abstract storage backend trait.
//!
//! Every storage backend must implement [`StorageBackend`].  The trait
//! works in terms of opaque byte payloads addressed by string keys, so the
//! URL adapter can decorate any implementation without knowing the medium.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by every [`StorageBackend`] method.
pub type BackendFuture<'a, T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send + 'a>>;

/// A stored object's data plus its content hash.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Raw bytes of the object.
    pub data: Bytes,
    /// Hex-encoded SHA-256 of `data`.
    pub content_hash: String,
}

/// Properties of a stored object, without its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Size in bytes.
    pub size: u64,
    /// MIME type, if the backend records one.
    pub content_type: Option<String>,
    /// Last modification time, if the backend records one.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Async object storage contract.
pub trait StorageBackend: Send + Sync + 'static {
    /// Write `data` to `key`, returning the content hash.
    fn put(&self, key: &str, data: Bytes) -> BackendFuture<'_, String>;

    /// Read the full object at `key`.
    fn get(&self, key: &str) -> BackendFuture<'_, StoredObject>;

    /// Delete the object at `key`.  Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> BackendFuture<'_, ()>;

    /// Check whether an object exists at `key`.
    fn exists(&self, key: &str) -> BackendFuture<'_, bool>;

    /// List every key starting with `prefix`, sorted.
    fn list(&self, prefix: &str) -> BackendFuture<'_, Vec<String>>;

    /// Fetch the properties of the object at `key`.
    fn metadata(&self, key: &str) -> BackendFuture<'_, ObjectMetadata>;
}
