//! Storage client capability used for URL construction.

/// Account-level view of a blob service client.
///
/// The URL adapter only needs two things from the client: the account name
/// (to scope signatures) and the provider's default public URL for a blob.
pub trait BlobClient: Send + Sync {
    /// Name of the storage account the client talks to.
    fn account_name(&self) -> &str;

    /// Default public URL of `path` inside `container`.
    fn blob_url(&self, container: &str, path: &str) -> String;
}
