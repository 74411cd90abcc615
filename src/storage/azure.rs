//! Azure Blob Storage REST client.
//!
//! [`AzureBlobClient`] is account-scoped: it knows the service endpoint and
//! the credentials, implements [`BlobClient`] for URL construction, and
//! hands out [`AzureContainerBackend`] values that implement
//! [`StorageBackend`] for a single container.
//!
//! Operation mapping:
//!   `put()`      -> Put Blob (BlockBlob, with Content-MD5)
//!   `get()`      -> Get Blob
//!   `delete()`   -> Delete Blob (404 ignored)
//!   `exists()`   -> Get Blob Properties (HEAD)
//!   `metadata()` -> Get Blob Properties (HEAD)
//!   `list()`     -> List Blobs, following `NextMarker`
//!
//! Requests are authorized with Shared Key, a pre-issued SAS token
//! appended to the URL, or not at all (public containers).

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use tracing::{debug, info};

use super::backend::{BackendFuture, ObjectMetadata, StorageBackend, StoredObject};
use super::client::BlobClient;

/// Azure REST API version used for all requests.
const AZURE_API_VERSION: &str = "2023-11-03";

/// Percent-encoding set for Azure blob names: encode everything except
/// unreserved characters and '/'.
const AZURE_BLOB_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Percent-encoding set for query values.
const AZURE_QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Azure authentication method.
pub enum AzureAuth {
    /// Shared Key authentication using the decoded storage account key.
    SharedKey { key_bytes: Vec<u8> },
    /// SAS token authentication (appended as query parameter).
    SasToken { token: String },
    /// No authorization header; only works against public containers.
    Anonymous,
}

impl AzureAuth {
    /// Shared Key auth from a base64-encoded account key.
    pub fn shared_key(account_key: &str) -> anyhow::Result<Self> {
        let key_bytes = BASE64_STANDARD
            .decode(account_key)
            .map_err(|e| anyhow::anyhow!("Invalid account key (not valid base64): {}", e))?;
        Ok(AzureAuth::SharedKey { key_bytes })
    }

    /// SAS token auth; a leading `?` is stripped.
    pub fn sas_token(token: &str) -> Self {
        let token = token.strip_prefix('?').unwrap_or(token);
        AzureAuth::SasToken {
            token: token.to_string(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AzureAuth::SharedKey { .. } => "shared-key",
            AzureAuth::SasToken { .. } => "sas-token",
            AzureAuth::Anonymous => "anonymous",
        }
    }
}

/// Account-scoped Azure Blob Storage client.
pub struct AzureBlobClient {
    /// HTTP client for Azure Blob REST API calls.
    http: reqwest::Client,
    /// Azure storage account name.
    account: String,
    /// Service endpoint without a trailing '/'.
    base_url: String,
    /// Path component of the endpoint (non-empty for path-style emulators).
    endpoint_path: String,
    /// Authentication method.
    auth: AzureAuth,
}

/// A single request to the Blob service, before signing.
struct BlobRequest<'a> {
    method: Method,
    container: &'a str,
    /// `None` for container-level operations.
    blob: Option<&'a str>,
    query: Vec<(&'static str, String)>,
    /// Extra `x-ms-*` headers.
    ms_headers: Vec<(&'static str, String)>,
    content_type: &'a str,
    content_md5: String,
    body: Option<Bytes>,
}

impl<'a> BlobRequest<'a> {
    fn new(method: Method, container: &'a str, blob: Option<&'a str>) -> Self {
        Self {
            method,
            container,
            blob,
            query: Vec::new(),
            ms_headers: Vec::new(),
            content_type: "",
            content_md5: String::new(),
            body: None,
        }
    }
}

impl AzureBlobClient {
    /// Create a new client for `account`.
    ///
    /// `endpoint` overrides the default `https://{account}.blob.core.windows.net`
    /// (sovereign clouds, Azurite).
    pub fn new(account: String, endpoint: Option<String>, auth: AzureAuth) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        let base_url = match endpoint.filter(|e| !e.is_empty()) {
            Some(e) => e.trim_end_matches('/').to_string(),
            None => format!("https://{}.blob.core.windows.net", account),
        };
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| anyhow::anyhow!("Invalid Azure endpoint '{}': {}", base_url, e))?;
        let endpoint_path = parsed.path().trim_end_matches('/').to_string();

        info!(
            "Azure blob client initialized: account={} endpoint={} auth={}",
            account,
            base_url,
            auth.kind()
        );

        Ok(Self {
            http,
            account,
            base_url,
            endpoint_path,
            auth,
        })
    }

    /// Storage backend bound to `container`.
    pub fn container(self: &Arc<Self>, container: impl Into<String>) -> AzureContainerBackend {
        AzureContainerBackend {
            client: Arc::clone(self),
            container: container.into(),
        }
    }

    /// Compute the base64 MD5 digest of the given data (Content-MD5).
    fn compute_md5(data: &[u8]) -> String {
        let mut hasher = Md5::new();
        hasher.update(data);
        BASE64_STANDARD.encode(hasher.finalize())
    }

    /// Get the current UTC date in RFC 1123 format for Azure headers.
    fn rfc1123_date() -> String {
        httpdate::fmt_http_date(std::time::SystemTime::now())
    }

    /// Full request URL, including the query string and any SAS token.
    fn request_url(&self, req: &BlobRequest<'_>) -> String {
        let mut url = format!("{}/{}", self.base_url, req.container);
        if let Some(blob) = req.blob {
            url.push('/');
            url.push_str(&utf8_percent_encode(blob, AZURE_BLOB_ENCODE_SET).to_string());
        }

        let mut pairs: Vec<String> = req
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, utf8_percent_encode(v, AZURE_QUERY_ENCODE_SET)))
            .collect();
        if let AzureAuth::SasToken { token } = &self.auth {
            pairs.push(token.clone());
        }
        if !pairs.is_empty() {
            url.push('?');
            url.push_str(&pairs.join("&"));
        }
        url
    }

    /// Canonicalized resource for Shared Key signing.
    ///
    /// Uses the un-encoded blob name, prefixed by the endpoint path so
    /// path-style endpoints (Azurite) sign correctly.
    fn canonicalized_resource(&self, req: &BlobRequest<'_>) -> String {
        let mut resource = format!("/{}{}/{}", self.account, self.endpoint_path, req.container);
        if let Some(blob) = req.blob {
            resource.push('/');
            resource.push_str(blob);
        }
        let mut params = req.query.clone();
        params.sort_by(|a, b| a.0.cmp(b.0));
        for (k, v) in &params {
            resource.push_str(&format!("\n{}:{}", k.to_lowercase(), v));
        }
        resource
    }

    /// Build the Shared Key `Authorization` header value.
    ///
    /// The string-to-sign format:
    /// ```text
    /// VERB\n
    /// Content-Encoding\n
    /// Content-Language\n
    /// Content-Length\n
    /// Content-MD5\n
    /// Content-Type\n
    /// Date\n
    /// If-Modified-Since\n
    /// If-Match\n
    /// If-None-Match\n
    /// If-Unmodified-Since\n
    /// Range\n
    /// CanonicalizedHeaders\n
    /// CanonicalizedResource
    /// ```
    fn shared_key_header(
        &self,
        key_bytes: &[u8],
        req: &BlobRequest<'_>,
        date: &str,
    ) -> anyhow::Result<String> {
        // Content-Length: empty for a zero or missing body.
        let content_length = match req.body.as_ref().map(|b| b.len()) {
            Some(0) | None => String::new(),
            Some(len) => len.to_string(),
        };

        let mut ms_headers: Vec<(String, String)> = vec![
            ("x-ms-date".to_string(), date.to_string()),
            ("x-ms-version".to_string(), AZURE_API_VERSION.to_string()),
        ];
        for (k, v) in &req.ms_headers {
            ms_headers.push((k.to_lowercase(), v.clone()));
        }
        ms_headers.sort_by(|a, b| a.0.cmp(&b.0));
        let canonicalized_headers = ms_headers
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v))
            .collect::<Vec<_>>()
            .join("\n");

        let string_to_sign = format!(
            "{}\n\n\n{}\n{}\n{}\n\n\n\n\n\n\n{}\n{}",
            req.method.as_str(),
            content_length,
            req.content_md5,
            req.content_type,
            canonicalized_headers,
            self.canonicalized_resource(req)
        );

        type HmacSha256 = Hmac<Sha256>;
        let mut mac = HmacSha256::new_from_slice(key_bytes)
            .map_err(|e| anyhow::anyhow!("HMAC key error: {}", e))?;
        mac.update(string_to_sign.as_bytes());
        let signature = BASE64_STANDARD.encode(mac.finalize().into_bytes());

        Ok(format!("SharedKey {}:{}", self.account, signature))
    }

    /// Sign (if needed) and send a request.
    async fn send(&self, req: BlobRequest<'_>) -> anyhow::Result<reqwest::Response> {
        let url = self.request_url(&req);
        let date = Self::rfc1123_date();

        let mut builder = self
            .http
            .request(req.method.clone(), &url)
            .header("x-ms-date", &date)
            .header("x-ms-version", AZURE_API_VERSION);
        for (k, v) in &req.ms_headers {
            builder = builder.header(*k, v);
        }
        if !req.content_type.is_empty() {
            builder = builder.header(CONTENT_TYPE, req.content_type);
        }
        if !req.content_md5.is_empty() {
            builder = builder.header("Content-MD5", &req.content_md5);
        }
        if let AzureAuth::SharedKey { key_bytes } = &self.auth {
            let auth_header = self.shared_key_header(key_bytes, &req, &date)?;
            builder = builder.header("Authorization", auth_header);
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        builder
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Azure {} request failed: {}", req.method, e))
    }

    /// Map an Azure HTTP error to an anyhow error with context.
    fn map_azure_error(context: &str, status: StatusCode, body: &str) -> anyhow::Error {
        anyhow::anyhow!("Azure {}: HTTP {} - {}", context, status, body)
    }

    async fn put_blob(&self, container: &str, blob: &str, data: Bytes) -> anyhow::Result<()> {
        let mut req = BlobRequest::new(Method::PUT, container, Some(blob));
        req.ms_headers
            .push(("x-ms-blob-type", "BlockBlob".to_string()));
        req.content_type = "application/octet-stream";
        req.content_md5 = Self::compute_md5(&data);
        req.body = Some(data);

        let resp = self.send(req).await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Self::map_azure_error("upload", status, &body));
        }
        Ok(())
    }

    async fn get_blob(&self, container: &str, blob: &str) -> anyhow::Result<Bytes> {
        let resp = self
            .send(BlobRequest::new(Method::GET, container, Some(blob)))
            .await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            anyhow::bail!("Object not found at key: {}", blob);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Self::map_azure_error("download", status, &body));
        }
        resp.bytes()
            .await
            .map_err(|e| anyhow::anyhow!("Azure download body read failed: {}", e))
    }

    async fn delete_blob(&self, container: &str, blob: &str) -> anyhow::Result<()> {
        let resp = self
            .send(BlobRequest::new(Method::DELETE, container, Some(blob)))
            .await?;
        let status = resp.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            let body = resp.text().await.unwrap_or_default();
            return Err(Self::map_azure_error("delete", status, &body));
        }
        Ok(())
    }

    /// Get Blob Properties; `None` when the blob does not exist.
    async fn blob_properties(
        &self,
        container: &str,
        blob: &str,
    ) -> anyhow::Result<Option<ObjectMetadata>> {
        let resp = self
            .send(BlobRequest::new(Method::HEAD, container, Some(blob)))
            .await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Self::map_azure_error("properties", status, ""));
        }
        Ok(Some(parse_properties(resp.headers())))
    }

    /// List Blobs with pagination.
    async fn list_blobs(&self, container: &str, prefix: &str) -> anyhow::Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let mut req = BlobRequest::new(Method::GET, container, None);
            req.query.push(("restype", "container".to_string()));
            req.query.push(("comp", "list".to_string()));
            if !prefix.is_empty() {
                req.query.push(("prefix", prefix.to_string()));
            }
            if let Some(m) = marker.take() {
                req.query.push(("marker", m));
            }

            let resp = self.send(req).await?;
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            if !status.is_success() {
                return Err(Self::map_azure_error("list_blobs", status, &body));
            }

            let (page, next) = parse_list_blobs(&body)?;
            debug!("Azure list page: {} blobs, more={}", page.len(), next.is_some());
            names.extend(page);

            match next {
                Some(m) => marker = Some(m),
                None => break,
            }
        }

        names.sort();
        Ok(names)
    }
}

impl BlobClient for AzureBlobClient {
    fn account_name(&self) -> &str {
        &self.account
    }

    fn blob_url(&self, container: &str, path: &str) -> String {
        let encoded = utf8_percent_encode(path.trim_start_matches('/'), AZURE_BLOB_ENCODE_SET);
        format!("{}/{}/{}", self.base_url, container, encoded)
    }
}

/// Extract [`ObjectMetadata`] from Get Blob Properties response headers.
fn parse_properties(headers: &reqwest::header::HeaderMap) -> ObjectMetadata {
    let size = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let last_modified = headers
        .get(LAST_MODIFIED)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| httpdate::parse_http_date(v).ok())
        .map(DateTime::<Utc>::from);
    ObjectMetadata {
        size,
        content_type,
        last_modified,
    }
}

// -- List Blobs XML --------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct EnumerationResults {
    #[serde(default)]
    blobs: BlobList,
    #[serde(default)]
    next_marker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BlobList {
    #[serde(rename = "Blob", default)]
    items: Vec<BlobItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct BlobItem {
    name: String,
}

/// Parse one List Blobs page into blob names and the next marker.
fn parse_list_blobs(body: &str) -> anyhow::Result<(Vec<String>, Option<String>)> {
    let results: EnumerationResults = quick_xml::de::from_str(body)
        .map_err(|e| anyhow::anyhow!("Malformed List Blobs response: {}", e))?;
    let names = results.blobs.items.into_iter().map(|b| b.name).collect();
    let next = results.next_marker.filter(|m| !m.is_empty());
    Ok((names, next))
}

// -- Container backend -----------------------------------------------------

/// [`StorageBackend`] over one Azure container.
pub struct AzureContainerBackend {
    client: Arc<AzureBlobClient>,
    container: String,
}

impl AzureContainerBackend {
    pub fn container(&self) -> &str {
        &self.container
    }
}

impl StorageBackend for AzureContainerBackend {
    fn put(&self, key: &str, data: Bytes) -> BackendFuture<'_, String> {
        let key = key.to_string();
        Box::pin(async move {
            debug!("Azure put: container={} blob={}", self.container, key);
            let content_hash = hex::encode(Sha256::digest(&data));
            self.client.put_blob(&self.container, &key, data).await?;
            Ok(content_hash)
        })
    }

    fn get(&self, key: &str) -> BackendFuture<'_, StoredObject> {
        let key = key.to_string();
        Box::pin(async move {
            debug!("Azure get: container={} blob={}", self.container, key);
            let data = self.client.get_blob(&self.container, &key).await?;
            let content_hash = hex::encode(Sha256::digest(&data));
            Ok(StoredObject { data, content_hash })
        })
    }

    fn delete(&self, key: &str) -> BackendFuture<'_, ()> {
        let key = key.to_string();
        Box::pin(async move {
            debug!("Azure delete: container={} blob={}", self.container, key);
            self.client.delete_blob(&self.container, &key).await
        })
    }

    fn exists(&self, key: &str) -> BackendFuture<'_, bool> {
        let key = key.to_string();
        Box::pin(async move {
            debug!("Azure exists: container={} blob={}", self.container, key);
            Ok(self
                .client
                .blob_properties(&self.container, &key)
                .await?
                .is_some())
        })
    }

    fn list(&self, prefix: &str) -> BackendFuture<'_, Vec<String>> {
        let prefix = prefix.to_string();
        Box::pin(async move {
            debug!("Azure list: container={} prefix='{}'", self.container, prefix);
            self.client.list_blobs(&self.container, &prefix).await
        })
    }

    fn metadata(&self, key: &str) -> BackendFuture<'_, ObjectMetadata> {
        let key = key.to_string();
        Box::pin(async move {
            self.client
                .blob_properties(&self.container, &key)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Object not found at key: {}", key))
        })
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: Option<&str>, auth: AzureAuth) -> AzureBlobClient {
        AzureBlobClient::new(
            "myaccount".to_string(),
            endpoint.map(str::to_string),
            auth,
        )
        .unwrap()
    }

    #[test]
    fn test_default_endpoint() {
        let c = client(None, AzureAuth::Anonymous);
        assert_eq!(c.account_name(), "myaccount");
        assert_eq!(
            c.blob_url("mycontainer", "images/a.png"),
            "https://myaccount.blob.core.windows.net/mycontainer/images/a.png"
        );
    }

    #[test]
    fn test_blob_url_encoding() {
        let c = client(None, AzureAuth::Anonymous);
        assert_eq!(
            c.blob_url("c", "/dir/my file+1.txt"),
            "https://myaccount.blob.core.windows.net/c/dir/my%20file%2B1.txt"
        );
    }

    #[test]
    fn test_custom_endpoint_trailing_slash() {
        let c = client(
            Some("http://127.0.0.1:10000/devstoreaccount1/"),
            AzureAuth::Anonymous,
        );
        assert_eq!(
            c.blob_url("c", "a.txt"),
            "http://127.0.0.1:10000/devstoreaccount1/c/a.txt"
        );
        assert_eq!(c.endpoint_path, "/devstoreaccount1");
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let result = AzureBlobClient::new(
            "acct".to_string(),
            Some("not a url".to_string()),
            AzureAuth::Anonymous,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_compute_md5_hello() {
        // md5("hello world") = 5eb63bbbe01eeed093cb22bb8f5acdc3
        assert_eq!(
            AzureBlobClient::compute_md5(b"hello world"),
            "XrY7u+Ae7tCTyyK7j1rNww=="
        );
    }

    #[test]
    fn test_sas_token_prefix_stripped() {
        match AzureAuth::sas_token("?sv=2021&sig=abc") {
            AzureAuth::SasToken { token } => assert_eq!(token, "sv=2021&sig=abc"),
            _ => panic!("expected SAS token auth"),
        }
    }

    #[test]
    fn test_shared_key_rejects_bad_base64() {
        assert!(AzureAuth::shared_key("%%%").is_err());
        assert!(AzureAuth::shared_key("dGVzdA==").is_ok());
    }

    #[test]
    fn test_request_url_appends_sas_token() {
        let c = client(None, AzureAuth::sas_token("sv=1&sig=x"));
        let mut req = BlobRequest::new(Method::GET, "c", None);
        req.query.push(("restype", "container".to_string()));
        req.query.push(("prefix", "a b/".to_string()));
        assert_eq!(
            c.request_url(&req),
            "https://myaccount.blob.core.windows.net/c?restype=container&prefix=a%20b%2F&sv=1&sig=x"
        );
    }

    #[test]
    fn test_canonicalized_resource_sorts_query() {
        let c = client(
            Some("http://127.0.0.1:10000/devstoreaccount1"),
            AzureAuth::Anonymous,
        );
        let mut req = BlobRequest::new(Method::GET, "c", None);
        req.query.push(("restype", "container".to_string()));
        req.query.push(("comp", "list".to_string()));
        assert_eq!(
            c.canonicalized_resource(&req),
            "/myaccount/devstoreaccount1/c\ncomp:list\nrestype:container"
        );
    }

    #[test]
    fn test_shared_key_header_format() {
        let c = client(None, AzureAuth::Anonymous);
        let req = BlobRequest::new(Method::GET, "c", Some("a.txt"));
        let header = c
            .shared_key_header(b"secret", &req, "Mon, 01 Jan 2024 00:00:00 GMT")
            .unwrap();
        assert!(header.starts_with("SharedKey myaccount:"));
        let sig = header.trim_start_matches("SharedKey myaccount:");
        assert_eq!(BASE64_STANDARD.decode(sig).unwrap().len(), 32);
    }

    #[test]
    fn test_parse_list_blobs_page() {
        let body = r#"<?xml version="1.0" encoding="utf-8"?>
<EnumerationResults ServiceEndpoint="https://myaccount.blob.core.windows.net/" ContainerName="c">
  <Prefix>img/</Prefix>
  <Blobs>
    <Blob><Name>img/a.png</Name><Properties><Content-Length>3</Content-Length></Properties></Blob>
    <Blob><Name>img/b.png</Name><Properties><Content-Length>4</Content-Length></Properties></Blob>
  </Blobs>
  <NextMarker>2!72!MDAwMDA</NextMarker>
</EnumerationResults>"#;
        let (names, next) = parse_list_blobs(body).unwrap();
        assert_eq!(names, vec!["img/a.png", "img/b.png"]);
        assert_eq!(next.as_deref(), Some("2!72!MDAwMDA"));
    }

    #[test]
    fn test_parse_list_blobs_last_page() {
        let body = r#"<?xml version="1.0" encoding="utf-8"?>
<EnumerationResults ContainerName="c">
  <Blobs>
    <Blob><Name>only.txt</Name></Blob>
  </Blobs>
  <NextMarker />
</EnumerationResults>"#;
        let (names, next) = parse_list_blobs(body).unwrap();
        assert_eq!(names, vec!["only.txt"]);
        assert!(next.is_none());
    }

    #[test]
    fn test_parse_properties_headers() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(CONTENT_LENGTH, "42".parse().unwrap());
        headers.insert(CONTENT_TYPE, "image/png".parse().unwrap());
        headers.insert(
            LAST_MODIFIED,
            "Sun, 06 Nov 1994 08:49:37 GMT".parse().unwrap(),
        );
        let meta = parse_properties(&headers);
        assert_eq!(meta.size, 42);
        assert_eq!(meta.content_type.as_deref(), Some("image/png"));
        assert_eq!(
            meta.last_modified.unwrap().to_rfc3339(),
            "1994-11-06T08:49:37+00:00"
        );
    }

    #[test]
    fn test_container_backend_binding() {
        let c = Arc::new(client(None, AzureAuth::Anonymous));
        let backend = c.container("photos");
        assert_eq!(backend.container(), "photos");
    }
}
