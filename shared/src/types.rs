//! Common types for the shared crate

use serde::{Deserialize, Serialize};

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Caller role as asserted by the upstream auth gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Customer,
    Staff,
}

impl UserRole {
    /// Parse a role header value; anything unknown is a customer
    pub fn from_header(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "staff" | "admin" => Self::Staff,
            _ => Self::Customer,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Staff)
    }
}
