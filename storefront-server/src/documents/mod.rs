//! Uploaded documents
//!
//! Page counts used for pricing come from here and nowhere else: the bytes
//! the customer uploaded are opened server-side and their pages counted.
//!
//! - [`inspect`]: format sniffing and page detection (PDF, PNG, JPEG, WebP)
//! - [`file_store`]: content-addressed storage of the accepted bytes

pub mod file_store;
pub mod inspect;

pub use file_store::{FileStore, LocalFileStore};
pub use inspect::{DocumentKind, inspect_document, inspect_upload};

use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Document failures
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{name} is empty")]
    Empty { name: String },

    #[error("{name} is {size} bytes, the limit is {limit}")]
    TooLarge {
        name: String,
        size: usize,
        limit: usize,
    },

    #[error("{name}: unsupported file format, expected PDF, PNG, JPEG or WebP")]
    Unsupported { name: String },

    #[error("{name}: unreadable document: {reason}")]
    Unreadable { name: String, reason: String },

    #[error("File storage failed: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Inspection task failed: {0}")]
    Task(String),
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        let code = match &err {
            DocumentError::Empty { .. } => ErrorCode::EmptyFile,
            DocumentError::TooLarge { .. } => ErrorCode::FileTooLarge,
            DocumentError::Unsupported { .. } => ErrorCode::UnsupportedFileFormat,
            DocumentError::Unreadable { .. } => ErrorCode::InvalidDocument,
            DocumentError::Storage(_) => ErrorCode::FileStorageFailed,
            DocumentError::Task(_) => ErrorCode::InternalError,
        };
        let app = AppError::with_message(code, err.to_string());
        match err {
            DocumentError::Empty { name }
            | DocumentError::Unsupported { name }
            | DocumentError::Unreadable { name, .. } => app.with_detail("file", name),
            DocumentError::TooLarge { name, limit, .. } => {
                app.with_detail("file", name).with_detail("limit", limit)
            }
            DocumentError::Storage(_) | DocumentError::Task(_) => app,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::http::StatusCode;

    #[test]
    fn test_too_large_is_413() {
        let err: AppError = DocumentError::TooLarge {
            name: "big.pdf".into(),
            size: 10,
            limit: 5,
        }
        .into();
        assert_eq!(err.code, ErrorCode::FileTooLarge);
        assert_eq!(err.http_status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.details.unwrap().get("limit").unwrap(), 5);
    }

    #[test]
    fn test_unreadable_is_client_error() {
        let err: AppError = DocumentError::Unreadable {
            name: "a.pdf".into(),
            reason: "no trailer".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidDocument);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }
}
