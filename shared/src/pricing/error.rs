//! Pricing failures
//!
//! Three kinds, kept apart so callers can react differently:
//! - [`PricingError::Validation`]: the client sent something it can correct
//! - [`PricingError::Policy`]: a business rule refused the request
//! - [`PricingError::Invariant`]: the rate table or arithmetic is broken

use crate::error::{AppError, ErrorCode};
use thiserror::Error;

/// A business rule refused the request
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PolicyRejection {
    #[error("Coupon is not active")]
    CouponInactive,

    #[error("Coupon is not valid yet")]
    CouponNotYetValid { valid_from: i64 },

    #[error("Coupon has expired")]
    CouponExpired { valid_till: i64 },

    #[error("Coupon usage limit reached")]
    CouponUsageLimitReached { usage_limit: u32 },

    #[error("Order amount {subtotal} is below the coupon minimum of {min_order_amount}")]
    CouponMinOrderNotMet { subtotal: f64, min_order_amount: f64 },

    #[error("Staple binding allows at most {cap} sheets, this job needs {sheets}")]
    StapleSheetCapExceeded { sheets: u64, cap: u64 },

    #[error("Insufficient wallet balance")]
    InsufficientWalletBalance { balance: f64, requested: f64 },
}

impl PolicyRejection {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::CouponInactive => ErrorCode::CouponInactive,
            Self::CouponNotYetValid { .. } => ErrorCode::CouponNotYetValid,
            Self::CouponExpired { .. } => ErrorCode::CouponExpired,
            Self::CouponUsageLimitReached { .. } => ErrorCode::CouponUsageLimitReached,
            Self::CouponMinOrderNotMet { .. } => ErrorCode::CouponMinOrderNotMet,
            Self::StapleSheetCapExceeded { .. } => ErrorCode::StapleSheetCapExceeded,
            Self::InsufficientWalletBalance { .. } => ErrorCode::InsufficientWalletBalance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// Client-correctable input problem, no charge computed
    #[error("{message}")]
    Validation { code: ErrorCode, message: String },

    #[error(transparent)]
    Policy(#[from] PolicyRejection),

    /// NaN, negative or missing rate; never priced as zero
    #[error("Pricing invariant violated: {0}")]
    Invariant(String),
}

impl PricingError {
    pub fn validation(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_selection(message: impl Into<String>) -> Self {
        Self::validation(ErrorCode::InvalidSelection, message)
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::Policy(rejection) => rejection.code(),
            Self::Invariant(_) => ErrorCode::PricingInvariantViolated,
        }
    }
}

pub type PricingResult<T> = Result<T, PricingError>;

impl From<PolicyRejection> for AppError {
    fn from(rejection: PolicyRejection) -> Self {
        let err = AppError::with_message(rejection.code(), rejection.to_string());
        match rejection {
            PolicyRejection::CouponNotYetValid { valid_from } => {
                err.with_detail("valid_from", valid_from)
            }
            PolicyRejection::CouponExpired { valid_till } => err.with_detail("valid_till", valid_till),
            PolicyRejection::CouponUsageLimitReached { usage_limit } => {
                err.with_detail("usage_limit", usage_limit)
            }
            PolicyRejection::CouponMinOrderNotMet {
                min_order_amount, ..
            } => err.with_detail("min_order_amount", min_order_amount),
            PolicyRejection::StapleSheetCapExceeded { sheets, cap } => {
                err.with_detail("sheets", sheets).with_detail("cap", cap)
            }
            PolicyRejection::InsufficientWalletBalance { balance, requested } => err
                .with_detail("balance", balance)
                .with_detail("requested", requested),
            PolicyRejection::CouponInactive => err,
        }
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::Validation { code, message } => AppError::with_message(code, message),
            PricingError::Policy(rejection) => rejection.into(),
            PricingError::Invariant(message) => {
                AppError::with_message(ErrorCode::PricingInvariantViolated, message)
            }
        }
    }
}
