use async_trait::async_trait;

use crate::core::error::Result;

/// Object storage for uploaded documents.
///
/// Keys are relative, path-like strings (`orders/0190….pdf`); adapters decide
/// where the object physically lives. A successful [`BlobStore::put`]
/// guarantees that [`BlobStore::public_url`] for the same key resolves to the
/// stored bytes.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key`. Errors are reported as `AppError::UploadFailure`.
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<()>;

    /// Publicly reachable URL for `key`
    fn public_url(&self, key: &str) -> String;
}
