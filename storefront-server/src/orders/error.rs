use shared::{AppError, ErrorCode, PricingError};
use thiserror::Error;

use crate::store::StoreError;

/// Order placement and editing errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("At least one document is required")]
    NoFiles,

    #[error("{0} was not inspected by the server")]
    UntrustedDocument(String),

    #[error("Coupon {0} not found")]
    CouponNotFound(String),

    #[error("A delivery address is required for delivery orders")]
    DeliveryAddressRequired,

    #[error("Nothing to print: the selection covers no pages")]
    Empty,

    #[error("Order {0} not found")]
    OrderNotFound(String),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl OrderError {
    /// Failures caused by broken state rather than by the request
    pub fn is_internal(&self) -> bool {
        match self {
            Self::Pricing(PricingError::Invariant(_)) => true,
            Self::Store(e) => matches!(
                e,
                StoreError::Database(_)
                    | StoreError::Transaction(_)
                    | StoreError::Table(_)
                    | StoreError::Storage(_)
                    | StoreError::Commit(_)
                    | StoreError::Serialization(_)
                    | StoreError::MissingRateTable
            ),
            _ => false,
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Pricing(e) => e.into(),
            OrderError::Store(e) => e.into(),
            OrderError::NoFiles => AppError::with_message(ErrorCode::NoFileProvided, err.to_string()),
            OrderError::UntrustedDocument(ref name) => {
                let name = name.clone();
                AppError::with_message(ErrorCode::UntrustedDocument, err.to_string())
                    .with_detail("file", name)
            }
            OrderError::CouponNotFound(ref code) => {
                let code = code.clone();
                AppError::with_message(ErrorCode::CouponNotFound, err.to_string())
                    .with_detail("code", code)
            }
            OrderError::DeliveryAddressRequired => {
                AppError::with_message(ErrorCode::DeliveryAddressRequired, err.to_string())
            }
            OrderError::Empty => AppError::with_message(ErrorCode::OrderEmpty, err.to_string()),
            OrderError::OrderNotFound(_) => {
                AppError::with_message(ErrorCode::OrderNotFound, err.to_string())
            }
        }
    }
}
