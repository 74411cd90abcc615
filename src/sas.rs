//! Shared Access Signature (SAS) generation.
//!
//! [`SasSigner`] is the seam the adapter signs through; [`BlobSasSigner`]
//! implements Azure's service SAS with the storage account key:
//!
//! ```text
//! signature = base64(HMAC-SHA256(base64_decode(account_key), string_to_sign))
//! ```
//!
//! The string-to-sign layout is the one for signed version 2020-12-06 and
//! later (16 newline-separated fields, unused ones left empty).

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Sha256;
use tracing::debug;

use crate::errors::AdapterError;

/// Signed version (`sv`) emitted in every token.
pub const SAS_VERSION: &str = "2021-06-08";

/// Signed resource type for a single blob.
pub const RESOURCE_TYPE_BLOB: &str = "b";

/// Read-only permission string.
pub const PERMISSION_READ: &str = "r";

/// Query values keep only RFC 3986 unreserved characters unencoded.
const SAS_QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Protocols a signed URL may be used over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SasProtocol {
    /// HTTPS only.
    #[default]
    Https,
    /// HTTPS or plain HTTP.
    HttpsAndHttp,
}

impl SasProtocol {
    /// Value of the `spr` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SasProtocol::Https => "https",
            SasProtocol::HttpsAndHttp => "https,http",
        }
    }
}

/// Account credentials handed to the signer for a single token.
#[derive(Clone, Copy)]
pub struct SasCredentials<'a> {
    pub account_name: &'a str,
    /// Base64-encoded storage account key.
    pub account_key: &'a str,
}

impl std::fmt::Debug for SasCredentials<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SasCredentials")
            .field("account_name", &self.account_name)
            .field("account_key", &"<redacted>")
            .finish()
    }
}

/// Parameters of a service SAS token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SasRequest {
    /// Signed resource (`sr`), e.g. `b` for a blob.
    pub resource_type: String,
    /// `{container}/{blob}` the token grants access to.
    pub resource_path: String,
    /// Signed permissions (`sp`).
    pub permissions: String,
    /// Signed expiry (`se`).
    pub expiry: DateTime<Utc>,
    /// Signed start (`st`).
    pub start: Option<DateTime<Utc>>,
    /// Stored access policy identifier (`si`).
    pub identifier: Option<String>,
    /// Allowed client IP or range (`sip`).
    pub ip_range: Option<String>,
    /// Signed protocol (`spr`).
    pub protocol: SasProtocol,
}

impl SasRequest {
    /// Read-only, HTTPS-only access to a single blob until `expiry`.
    pub fn read_blob(resource_path: impl Into<String>, expiry: DateTime<Utc>) -> Self {
        Self {
            resource_type: RESOURCE_TYPE_BLOB.to_string(),
            resource_path: resource_path.into(),
            permissions: PERMISSION_READ.to_string(),
            expiry,
            start: None,
            identifier: None,
            ip_range: None,
            protocol: SasProtocol::Https,
        }
    }
}

/// Produces the query string of a signed blob URL.
pub trait SasSigner: Send + Sync {
    /// Generate a SAS query string (without the leading `?`).
    fn generate_blob_token(
        &self,
        credentials: &SasCredentials<'_>,
        request: &SasRequest,
    ) -> Result<String, AdapterError>;
}

/// Service SAS signer using the storage account shared key.
#[derive(Debug, Clone, Default)]
pub struct BlobSasSigner;

impl BlobSasSigner {
    pub fn new() -> Self {
        Self
    }

    /// Format a timestamp the way SAS fields expect (`YYYY-MM-DDTHH:MM:SSZ`).
    pub fn format_time(time: &DateTime<Utc>) -> String {
        time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }

    /// Canonicalized resource: `/blob/{account}/{container}/{blob}`.
    fn canonicalized_resource(account_name: &str, resource_path: &str) -> String {
        format!("/blob/{}/{}", account_name, resource_path)
    }

    /// Build the string-to-sign for `request`.
    pub(crate) fn string_to_sign(account_name: &str, request: &SasRequest) -> String {
        let start = request
            .start
            .as_ref()
            .map(Self::format_time)
            .unwrap_or_default();
        let expiry = Self::format_time(&request.expiry);
        let resource = Self::canonicalized_resource(account_name, &request.resource_path);
        let fields: [&str; 16] = [
            request.permissions.as_str(),
            start.as_str(),
            expiry.as_str(),
            resource.as_str(),
            request.identifier.as_deref().unwrap_or(""),
            request.ip_range.as_deref().unwrap_or(""),
            request.protocol.as_str(),
            SAS_VERSION,
            request.resource_type.as_str(),
            "", // signedSnapshotTime
            "", // signedEncryptionScope
            "", // rscc
            "", // rscd
            "", // rsce
            "", // rscl
            "", // rsct
        ];
        fields.join("\n")
    }

    /// HMAC-SHA256 `string_to_sign` with the decoded account key.
    fn sign(account_key: &str, string_to_sign: &str) -> Result<String, AdapterError> {
        let key_bytes = BASE64_STANDARD
            .decode(account_key)
            .map_err(|e| AdapterError::InvalidAccountKey(format!("not valid base64: {}", e)))?;

        type HmacSha256 = Hmac<Sha256>;
        let mut mac = HmacSha256::new_from_slice(&key_bytes)
            .map_err(|e| AdapterError::InvalidAccountKey(format!("HMAC key error: {}", e)))?;
        mac.update(string_to_sign.as_bytes());
        Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, SAS_QUERY_ENCODE_SET).to_string()
}

impl SasSigner for BlobSasSigner {
    fn generate_blob_token(
        &self,
        credentials: &SasCredentials<'_>,
        request: &SasRequest,
    ) -> Result<String, AdapterError> {
        let string_to_sign = Self::string_to_sign(credentials.account_name, request);
        let signature = Self::sign(credentials.account_key, &string_to_sign)?;

        let mut params: Vec<(&str, String)> = vec![("sv", SAS_VERSION.to_string())];
        if let Some(start) = &request.start {
            params.push(("st", Self::format_time(start)));
        }
        params.push(("se", Self::format_time(&request.expiry)));
        params.push(("sr", request.resource_type.clone()));
        params.push(("sp", request.permissions.clone()));
        if let Some(ip) = &request.ip_range {
            params.push(("sip", ip.clone()));
        }
        if let Some(id) = &request.identifier {
            params.push(("si", id.clone()));
        }
        params.push(("spr", request.protocol.as_str().to_string()));
        params.push(("sig", signature));

        debug!(
            resource = %request.resource_path,
            expiry = %Self::format_time(&request.expiry),
            "Generated blob SAS token"
        );

        Ok(params
            .iter()
            .map(|(k, v)| format!("{}={}", k, encode(v)))
            .collect::<Vec<_>>()
            .join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // base64("testkeytestkeytestkeytestkey")
    const TEST_KEY: &str = "dGVzdGtleXRlc3RrZXl0ZXN0a2V5dGVzdGtleQ==";

    fn expiry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap()
    }

    fn creds() -> SasCredentials<'static> {
        SasCredentials {
            account_name: "testaccount",
            account_key: TEST_KEY,
        }
    }

    #[test]
    fn test_format_time() {
        assert_eq!(BlobSasSigner::format_time(&expiry()), "2030-01-02T03:04:05Z");
    }

    #[test]
    fn test_protocol_strings() {
        assert_eq!(SasProtocol::Https.as_str(), "https");
        assert_eq!(SasProtocol::HttpsAndHttp.as_str(), "https,http");
        assert_eq!(SasProtocol::default(), SasProtocol::Https);
    }

    #[test]
    fn test_read_blob_defaults() {
        let req = SasRequest::read_blob("mycontainer/a.png", expiry());
        assert_eq!(req.resource_type, "b");
        assert_eq!(req.permissions, "r");
        assert_eq!(req.protocol, SasProtocol::Https);
        assert!(req.start.is_none());
        assert!(req.identifier.is_none());
        assert!(req.ip_range.is_none());
    }

    #[test]
    fn test_string_to_sign_layout() {
        let req = SasRequest::read_blob("mycontainer/images/a.png", expiry());
        let sts = BlobSasSigner::string_to_sign("testaccount", &req);
        let lines: Vec<&str> = sts.split('\n').collect();
        assert_eq!(lines.len(), 16);
        assert_eq!(lines[0], "r");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "2030-01-02T03:04:05Z");
        assert_eq!(lines[3], "/blob/testaccount/mycontainer/images/a.png");
        assert_eq!(lines[6], "https");
        assert_eq!(lines[7], SAS_VERSION);
        assert_eq!(lines[8], "b");
        assert!(lines[9..].iter().all(|l| l.is_empty()));
    }

    #[test]
    fn test_string_to_sign_optional_fields() {
        let mut req = SasRequest::read_blob("c/b.txt", expiry());
        req.start = Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
        req.identifier = Some("policy1".to_string());
        req.ip_range = Some("10.0.0.1-10.0.0.9".to_string());
        req.protocol = SasProtocol::HttpsAndHttp;
        let sts = BlobSasSigner::string_to_sign("acct", &req);
        let lines: Vec<&str> = sts.split('\n').collect();
        assert_eq!(lines[1], "2030-01-01T00:00:00Z");
        assert_eq!(lines[4], "policy1");
        assert_eq!(lines[5], "10.0.0.1-10.0.0.9");
        assert_eq!(lines[6], "https,http");
    }

    #[test]
    fn test_token_query_layout() {
        let req = SasRequest::read_blob("mycontainer/a.png", expiry());
        let token = BlobSasSigner::new()
            .generate_blob_token(&creds(), &req)
            .unwrap();
        let keys: Vec<&str> = token
            .split('&')
            .map(|kv| kv.split('=').next().unwrap())
            .collect();
        assert_eq!(keys, vec!["sv", "se", "sr", "sp", "spr", "sig"]);
        assert!(token.starts_with("sv=2021-06-08&se=2030-01-02T03%3A04%3A05Z&sr=b&sp=r&spr=https&sig="));
    }

    #[test]
    fn test_signature_matches_recomputed_hmac() {
        let req = SasRequest::read_blob("mycontainer/a.png", expiry());
        let token = BlobSasSigner::new()
            .generate_blob_token(&creds(), &req)
            .unwrap();

        let sts = BlobSasSigner::string_to_sign("testaccount", &req);
        let key = BASE64_STANDARD.decode(TEST_KEY).unwrap();
        let mut mac = Hmac::<Sha256>::new_from_slice(&key).unwrap();
        mac.update(sts.as_bytes());
        let expected = BASE64_STANDARD.encode(mac.finalize().into_bytes());

        let sig = token.rsplit("sig=").next().unwrap();
        assert_eq!(sig, encode(&expected));
    }

    #[test]
    fn test_token_is_deterministic() {
        let req = SasRequest::read_blob("mycontainer/a.png", expiry());
        let signer = BlobSasSigner::new();
        let a = signer.generate_blob_token(&creds(), &req).unwrap();
        let b = signer.generate_blob_token(&creds(), &req).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_token_changes_with_path() {
        let signer = BlobSasSigner::new();
        let a = signer
            .generate_blob_token(&creds(), &SasRequest::read_blob("c/a.txt", expiry()))
            .unwrap();
        let b = signer
            .generate_blob_token(&creds(), &SasRequest::read_blob("c/b.txt", expiry()))
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_optional_params_emitted() {
        let mut req = SasRequest::read_blob("c/b.txt", expiry());
        req.start = Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap());
        req.ip_range = Some("10.0.0.1".to_string());
        req.identifier = Some("policy1".to_string());
        req.protocol = SasProtocol::HttpsAndHttp;
        let token = BlobSasSigner::new()
            .generate_blob_token(&creds(), &req)
            .unwrap();
        assert!(token.contains("&st=2030-01-01T00%3A00%3A00Z&"));
        assert!(token.contains("&sip=10.0.0.1&"));
        assert!(token.contains("&si=policy1&"));
        assert!(token.contains("&spr=https%2Chttp&"));
    }

    #[test]
    fn test_invalid_base64_key() {
        let bad = SasCredentials {
            account_name: "acct",
            account_key: "not base64!!",
        };
        let err = BlobSasSigner::new()
            .generate_blob_token(&bad, &SasRequest::read_blob("c/a", expiry()))
            .unwrap_err();
        assert!(matches!(err, AdapterError::InvalidAccountKey(_)));
    }

    #[test]
    fn test_credentials_debug_redacts_key() {
        let rendered = format!("{:?}", creds());
        assert!(rendered.contains("testaccount"));
        assert!(!rendered.contains(TEST_KEY));
    }
}
