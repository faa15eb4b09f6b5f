//! Document File Model

use serde::{Deserialize, Serialize};

/// Uploaded document metadata
///
/// Only records produced by server-side inspection carry
/// `server_trusted = true`; orders are never priced from anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFile {
    pub name: String,
    pub byte_size: u64,
    pub detected_page_count: u32,
    #[serde(default)]
    pub server_trusted: bool,
    /// Content address in the file store (sha256 hex)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl DocumentFile {
    /// Page count the customer claims; good for an estimate only
    pub fn declared(name: impl Into<String>, pages: u32) -> Self {
        Self {
            name: name.into(),
            byte_size: 0,
            detected_page_count: pages,
            server_trusted: false,
            content_hash: None,
        }
    }
}

/// Declared document in an estimate request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredDocument {
    #[serde(default)]
    pub name: String,
    pub page_count: u32,
}

impl From<DeclaredDocument> for DocumentFile {
    fn from(doc: DeclaredDocument) -> Self {
        DocumentFile::declared(doc.name, doc.page_count)
    }
}
