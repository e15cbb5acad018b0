//! Local-disk image store.
//!
//! Files live flat in one directory and are exposed under `images/<file>`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use agora_core::ports::{ImageStore, StorageError};

/// URL prefix under which stored images are served.
pub const PUBLIC_PREFIX: &str = "images";

/// Stores images in a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the upload directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a public URL back to a path inside the upload directory.
    fn resolve(&self, image_url: &str) -> Result<PathBuf, StorageError> {
        let file_name = image_url
            .trim_start_matches('/')
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| StorageError::InvalidPath(image_url.to_string()))?;

        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name == "."
            || file_name == ".."
        {
            return Err(StorageError::InvalidPath(image_url.to_string()));
        }

        Ok(self.root.join(file_name))
    }
}

/// Keep only characters that are safe in a file name.
fn sanitize(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let file_name = format!("{}_{}", Uuid::new_v4().simple(), sanitize(original_name));
        let path = self.root.join(&file_name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(file = %file_name, size = bytes.len(), "Image stored");
        Ok(format!("{PUBLIC_PREFIX}/{file_name}"))
    }

    async fn exists(&self, image_url: &str) -> Result<bool, StorageError> {
        let Ok(path) = self.resolve(image_url) else {
            return Ok(false);
        };

        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    async fn remove(&self, image_url: &str) -> Result<(), StorageError> {
        let path = self.resolve(image_url)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(image_url = %image_url, "Image removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(image_url.to_string()))
            }
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}
