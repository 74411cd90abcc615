//! Blob URL adapter.
//!
//! [`BlobUrlAdapter`] decorates a [`StorageBackend`] for one container.
//! Storage calls are forwarded with the configured path prefix applied;
//! on top of that the adapter builds public URLs ([`BlobUrlAdapter::url`])
//! and read-only signed URLs ([`BlobUrlAdapter::temporary_url`]).
//!
//! URL layout with a custom base URL:
//!   `{url without trailing '/'}/{container}/{path without leading '/'}`
//! where the container segment is dropped for the `$root` container.
//! Without a custom base URL the storage client's own blob URL is used.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info};

use crate::errors::AdapterError;
use crate::metrics::{STORAGE_OPERATIONS_TOTAL, URLS_TOTAL};
use crate::sas::{BlobSasSigner, SasCredentials, SasProtocol, SasRequest, SasSigner};
use crate::storage::backend::{BackendFuture, ObjectMetadata, StorageBackend, StoredObject};
use crate::storage::client::BlobClient;

/// Reserved name of the account's root container.
pub const ROOT_CONTAINER: &str = "$root";

/// Construction options for [`BlobUrlAdapter`].
///
/// Empty strings in the optional fields are treated as absent.
#[derive(Clone, Default)]
pub struct AdapterOptions {
    /// Container the adapter is bound to.
    pub container: String,
    /// Custom base URL used by [`BlobUrlAdapter::url`] (CDN, proxy).
    pub url: Option<String>,
    /// Prefix prepended to every storage key.
    pub prefix: Option<String>,
    /// Base64 storage account key, needed only for temporary URLs.
    pub account_key: Option<String>,
}

impl AdapterOptions {
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_account_key(mut self, account_key: impl Into<String>) -> Self {
        self.account_key = Some(account_key.into());
        self
    }
}

impl std::fmt::Debug for AdapterOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterOptions")
            .field("container", &self.container)
            .field("url", &self.url)
            .field("prefix", &self.prefix)
            .field("account_key", &self.account_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Optional signing parameters for [`BlobUrlAdapter::temporary_url`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemporaryUrlOptions {
    /// Time the signature becomes valid; immediately when absent.
    pub start: Option<DateTime<Utc>>,
    /// Stored access policy identifier.
    pub identifier: Option<String>,
    /// Client IP address or range allowed to use the URL.
    pub ip_range: Option<String>,
    /// Allowed protocols; HTTPS only by default.
    pub protocol: SasProtocol,
}

/// Storage decorator adding public and signed URL generation.
pub struct BlobUrlAdapter {
    /// Shared storage client; owned by the caller.
    client: Arc<dyn BlobClient>,
    /// Backend the storage operations are forwarded to.
    inner: Arc<dyn StorageBackend>,
    /// Signing helper for temporary URLs.
    signer: Arc<dyn SasSigner>,
    container: String,
    url: Option<String>,
    /// Normalised prefix: empty, or ending in exactly one '/'.
    prefix: String,
    account_key: Option<String>,
}

impl std::fmt::Debug for BlobUrlAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobUrlAdapter")
            .field("container", &self.container)
            .field("url", &self.url)
            .field("prefix", &self.prefix)
            .field("account_key", &self.account_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Accept only absolute URLs written as `scheme://host...` with a non-empty
/// host.  The parser repairs inputs such as `http:/x`, so the authority
/// separator is checked on the raw string.
fn validate_custom_url(url: &str) -> Result<(), AdapterError> {
    let valid = url::Url::parse(url)
        .map(|parsed| {
            url.get(parsed.scheme().len()..)
                .is_some_and(|rest| rest.starts_with("://"))
                && parsed.host_str().is_some_and(|h| !h.is_empty())
        })
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(AdapterError::InvalidCustomUrl {
            url: url.to_string(),
        })
    }
}

/// Strip surrounding '/' and re-append a single trailing one.
fn normalize_prefix(prefix: Option<String>) -> String {
    match prefix {
        Some(p) => {
            let trimmed = p.trim_matches('/');
            if trimmed.is_empty() {
                String::new()
            } else {
                format!("{}/", trimmed)
            }
        }
        None => String::new(),
    }
}

impl BlobUrlAdapter {
    /// Create an adapter for `options.container`.
    ///
    /// Fails with [`AdapterError::InvalidCustomUrl`] when a non-empty custom
    /// URL is not a well-formed absolute URL.  No I/O is performed.
    pub fn new(
        client: Arc<dyn BlobClient>,
        inner: Arc<dyn StorageBackend>,
        options: AdapterOptions,
    ) -> Result<Self, AdapterError> {
        let url = non_empty(options.url);
        if let Some(u) = &url {
            validate_custom_url(u)?;
        }
        let prefix = normalize_prefix(non_empty(options.prefix));

        info!(
            "Blob URL adapter initialized: container={} custom_url={} prefix='{}'",
            options.container,
            url.as_deref().unwrap_or("-"),
            prefix
        );

        Ok(Self {
            client,
            inner,
            signer: Arc::new(BlobSasSigner::new()),
            container: options.container,
            url,
            prefix,
            account_key: non_empty(options.account_key),
        })
    }

    /// Replace the signing helper.
    pub fn with_signer(mut self, signer: Arc<dyn SasSigner>) -> Self {
        self.signer = signer;
        self
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Public URL of `path`.  Pure string composition; the blob need not exist.
    pub fn url(&self, path: &str) -> String {
        counter!(URLS_TOTAL, "kind" => "public").increment(1);
        self.compose_url(path)
    }

    fn compose_url(&self, path: &str) -> String {
        match &self.url {
            Some(base) => {
                let container = if self.container == ROOT_CONTAINER {
                    String::new()
                } else {
                    format!("{}/", self.container)
                };
                format!(
                    "{}/{}{}",
                    base.trim_end_matches('/'),
                    container,
                    path.trim_start_matches('/')
                )
            }
            None => self.client.blob_url(&self.container, path),
        }
    }

    /// URL of `path` carrying a read-only signature valid until `expiry`.
    ///
    /// The signed resource is `{container}/{path}` with `path` exactly as
    /// given, while the URL itself drops leading '/' from `path`.  A path such
    /// as `/a.txt` is therefore signed as `container//a.txt` and the signature
    /// will not match the blob; pass paths without a leading '/'.
    pub fn temporary_url(
        &self,
        path: &str,
        expiry: DateTime<Utc>,
        options: &TemporaryUrlOptions,
    ) -> Result<String, AdapterError> {
        let account_key = self
            .account_key
            .as_deref()
            .ok_or(AdapterError::MissingAccountKey)?;
        let credentials = SasCredentials {
            account_name: self.client.account_name(),
            account_key,
        };

        let request = SasRequest {
            start: options.start,
            identifier: options.identifier.clone(),
            ip_range: options.ip_range.clone(),
            protocol: options.protocol,
            ..SasRequest::read_blob(format!("{}/{}", self.container, path), expiry)
        };
        let token = self.signer.generate_blob_token(&credentials, &request)?;

        debug!(
            "Temporary URL generated: container={} path={} expiry={}",
            self.container, path, expiry
        );
        counter!(URLS_TOTAL, "kind" => "temporary").increment(1);

        Ok(format!("{}?{}", self.compose_url(path), token))
    }

    /// Storage key for `path` inside the inner backend.
    fn prefixed(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path.trim_start_matches('/'))
    }

    fn record(operation: &'static str) {
        counter!(STORAGE_OPERATIONS_TOTAL, "operation" => operation).increment(1);
    }
}

impl StorageBackend for BlobUrlAdapter {
    fn put(&self, key: &str, data: Bytes) -> BackendFuture<'_, String> {
        Self::record("put");
        self.inner.put(&self.prefixed(key), data)
    }

    fn get(&self, key: &str) -> BackendFuture<'_, StoredObject> {
        Self::record("get");
        self.inner.get(&self.prefixed(key))
    }

    fn delete(&self, key: &str) -> BackendFuture<'_, ()> {
        Self::record("delete");
        self.inner.delete(&self.prefixed(key))
    }

    fn exists(&self, key: &str) -> BackendFuture<'_, bool> {
        Self::record("exists");
        self.inner.exists(&self.prefixed(key))
    }

    fn list(&self, prefix: &str) -> BackendFuture<'_, Vec<String>> {
        Self::record("list");
        let full_prefix = self.prefixed(prefix);
        Box::pin(async move {
            let keys = self.inner.list(&full_prefix).await?;
            Ok(keys
                .into_iter()
                .filter_map(|k| k.strip_prefix(self.prefix.as_str()).map(str::to_string))
                .collect())
        })
    }

    fn metadata(&self, key: &str) -> BackendFuture<'_, ObjectMetadata> {
        Self::record("metadata");
        self.inner.metadata(&self.prefixed(key))
    }
}
