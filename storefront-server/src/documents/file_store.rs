//! Uploaded file storage
//!
//! Files are addressed by the sha256 of their content, so re-uploading the
//! same document stores it once.

use async_trait::async_trait;
use std::path::PathBuf;

use super::DocumentError;

/// Object storage for accepted uploads
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `bytes` under `content_hash`; storing the same hash twice is a no-op
    async fn put(&self, content_hash: &str, bytes: &[u8]) -> Result<(), DocumentError>;
}

/// Files on local disk, `{root}/{hash[..2]}/{hash}`
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, content_hash: &str) -> Result<PathBuf, DocumentError> {
        if content_hash.len() < 2 || !content_hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DocumentError::Storage(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid content hash '{content_hash}'"),
            )));
        }
        Ok(self.root.join(&content_hash[..2]).join(content_hash))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn put(&self, content_hash: &str, bytes: &[u8]) -> Result<(), DocumentError> {
        let path = self.path_for(content_hash)?;
        if tokio::fs::try_exists(&path).await? {
            tracing::debug!(hash = %content_hash, "Duplicate upload, already stored");
            return Ok(());
        }
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        // write-then-rename so a crash never leaves a truncated file under the hash
        let tmp = path.with_extension("part");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::info!(hash = %content_hash, size = bytes.len(), "Upload stored");
        Ok(())
    }
}
