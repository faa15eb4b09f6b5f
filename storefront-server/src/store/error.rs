use shared::{AppError, ErrorCode, PricingError};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A record refused the change (wallet floor, invalid amount, coupon terms)
    #[error(transparent)]
    Rejected(#[from] PricingError),

    #[error("Rate table rejected: {0}")]
    InvalidRateTable(String),

    #[error("No rate table stored")]
    MissingRateTable,

    #[error("Coupon not found: {0}")]
    CouponNotFound(String),

    #[error("Coupon {code} reached its usage limit of {usage_limit}")]
    CouponLimitReached { code: String, usage_limit: u32 },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order already exists: {0}")]
    OrderExists(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Map redb failures onto system codes
fn classify_storage_error(e: &StoreError) -> ErrorCode {
    if matches!(e, StoreError::Serialization(_) | StoreError::MissingRateTable) {
        return ErrorCode::StorageCorrupted;
    }

    // redb only exposes these through the message
    let err_str = e.to_string().to_lowercase();
    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
    {
        return ErrorCode::StorageFull;
    }
    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::StorageCorrupted;
    }
    if err_str.contains("already open") || err_str.contains("database already open") {
        return ErrorCode::SystemBusy;
    }
    ErrorCode::DatabaseError
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Rejected(e) => e.into(),
            StoreError::InvalidRateTable(msg) => {
                AppError::with_message(ErrorCode::RateTableInvalid, msg)
            }
            StoreError::CouponNotFound(code) => {
                AppError::with_message(ErrorCode::CouponNotFound, format!("Coupon {code} not found"))
                    .with_detail("code", code)
            }
            // Lost the race between pricing and commit
            StoreError::CouponLimitReached { code, usage_limit } => {
                AppError::conflict("Coupon usage limit reached")
                    .with_detail("code", code)
                    .with_detail("usage_limit", usage_limit)
            }
            StoreError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
            }
            StoreError::OrderExists(id) => {
                AppError::conflict(format!("Order {id} already exists"))
            }
            e => {
                let code = classify_storage_error(&e);
                tracing::error!(error = %e, code = %code, "Storage failure");
                AppError::with_message(code, e.to_string())
            }
        }
    }
}
