//! blobgate library — Azure Blob Storage adapter with URL generation.
//!
//! [`adapter::BlobUrlAdapter`] wraps any [`storage::backend::StorageBackend`]
//! for a single container, applies an optional key prefix to every storage
//! operation, and builds public URLs and read-only SAS-signed temporary URLs
//! for blobs.

pub mod adapter;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod sas;
pub mod storage;

pub use adapter::{AdapterOptions, BlobUrlAdapter, TemporaryUrlOptions};
pub use errors::AdapterError;
