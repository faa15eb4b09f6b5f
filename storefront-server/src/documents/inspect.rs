//! Server-side page detection
//!
//! The format comes from the bytes, not the file name or the browser's
//! content type. PDFs are counted from their page tree; a raster image is
//! one page.

use axum::body::Bytes;
use image::ImageFormat;
use sha2::{Digest, Sha256};
use shared::models::DocumentFile;
use std::io::Cursor;

use super::DocumentError;

/// A PDF header may sit anywhere in the first KiB
const PDF_HEADER_WINDOW: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Png,
    Jpeg,
    WebP,
}

impl DocumentKind {
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        let head = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
        if head.windows(5).any(|w| w == b"%PDF-") {
            return Some(Self::Pdf);
        }
        match image::guess_format(bytes) {
            Ok(ImageFormat::Png) => Some(Self::Png),
            Ok(ImageFormat::Jpeg) => Some(Self::Jpeg),
            Ok(ImageFormat::WebP) => Some(Self::WebP),
            _ => None,
        }
    }
}

fn unreadable(name: &str, reason: impl std::fmt::Display) -> DocumentError {
    DocumentError::Unreadable {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn count_pages(kind: DocumentKind, name: &str, bytes: &[u8]) -> Result<u32, DocumentError> {
    match kind {
        DocumentKind::Pdf => {
            let doc = lopdf::Document::load_mem(bytes).map_err(|e| unreadable(name, e))?;
            let pages = doc.get_pages().len();
            if pages == 0 {
                return Err(unreadable(name, "document has no pages"));
            }
            u32::try_from(pages).map_err(|_| unreadable(name, "too many pages"))
        }
        DocumentKind::Png | DocumentKind::Jpeg | DocumentKind::WebP => {
            image::ImageReader::new(Cursor::new(bytes))
                .with_guessed_format()
                .map_err(|e| unreadable(name, e))?
                .into_dimensions()
                .map_err(|e| unreadable(name, e))?;
            Ok(1)
        }
    }
}

fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Open an uploaded file and produce trusted metadata for pricing
pub fn inspect_document(
    name: &str,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<DocumentFile, DocumentError> {
    if bytes.is_empty() {
        return Err(DocumentError::Empty {
            name: name.to_string(),
        });
    }
    if bytes.len() > max_bytes {
        return Err(DocumentError::TooLarge {
            name: name.to_string(),
            size: bytes.len(),
            limit: max_bytes,
        });
    }
    let kind = DocumentKind::sniff(bytes).ok_or_else(|| DocumentError::Unsupported {
        name: name.to_string(),
    })?;
    let pages = count_pages(kind, name, bytes)?;

    tracing::debug!(file = %name, kind = ?kind, pages, size = bytes.len(), "Document inspected");

    Ok(DocumentFile {
        name: name.to_string(),
        byte_size: bytes.len() as u64,
        detected_page_count: pages,
        server_trusted: true,
        content_hash: Some(content_hash(bytes)),
    })
}

/// [`inspect_document`] off the async runtime; PDF parsing is CPU-bound
pub async fn inspect_upload(
    name: String,
    bytes: Bytes,
    max_bytes: usize,
) -> Result<DocumentFile, DocumentError> {
    tokio::task::spawn_blocking(move || inspect_document(&name, &bytes, max_bytes))
        .await
        .map_err(|e| DocumentError::Task(e.to_string()))?
}
