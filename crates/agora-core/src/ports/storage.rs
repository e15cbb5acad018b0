//! Image storage port.

use async_trait::async_trait;

/// Stores uploaded images and hands back a publicly retrievable URL path.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `bytes` under a name derived from `original_name`.
    /// Returns the URL path (e.g. `images/<file>`) to store on the post.
    async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, StorageError>;

    /// Whether `image_url` names a file this store holds.
    async fn exists(&self, image_url: &str) -> Result<bool, StorageError>;

    /// Delete the file behind an URL previously returned by [`ImageStore::store`].
    async fn remove(&self, image_url: &str) -> Result<(), StorageError>;
}

/// Image storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid image path: {0}")]
    InvalidPath(String),

    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(String),
}
