//! Adapter error types.
//!
//! Construction and signing failures get their own variants so callers can
//! match on them.  Everything raised by a delegated storage backend is
//! carried through untouched in [`AdapterError::Storage`].

use thiserror::Error;

/// Errors raised by the blob URL adapter and its signing helper.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The custom base URL passed at construction is not an absolute URL.
    #[error("The custom URL '{url}' is not a valid absolute URL")]
    InvalidCustomUrl { url: String },

    /// A temporary URL was requested but no account key was configured.
    #[error("An account key is required to generate a temporary URL")]
    MissingAccountKey,

    /// The configured account key cannot be used for HMAC signing.
    #[error("Invalid account key: {0}")]
    InvalidAccountKey(String),

    /// Failure reported by the delegated storage backend.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl AdapterError {
    /// Short machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AdapterError::InvalidCustomUrl { .. } => "InvalidCustomUrl",
            AdapterError::MissingAccountKey => "MissingAccountKey",
            AdapterError::InvalidAccountKey(_) => "InvalidAccountKey",
            AdapterError::Storage(_) => "StorageError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_custom_url_message() {
        let err = AdapterError::InvalidCustomUrl {
            url: "not a url".to_string(),
        };
        assert_eq!(err.code(), "InvalidCustomUrl");
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_storage_error_is_transparent() {
        let err: AdapterError = anyhow::anyhow!("Azure download: HTTP 500").into();
        assert_eq!(err.code(), "StorageError");
        assert_eq!(err.to_string(), "Azure download: HTTP 500");
    }
}
