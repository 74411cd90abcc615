//! Storage backends and clients.
//!
//! The [`backend::StorageBackend`] trait abstracts over where bytes
//! physically live; [`client::BlobClient`] is the account-level view used
//! to build default blob URLs.  Implementations: an Azure Blob REST client
//! and an in-memory backend.

pub mod azure;
pub mod backend;
pub mod client;
pub mod memory;
