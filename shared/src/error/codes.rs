//! Unified error codes for the print storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order / pricing errors
//! - 5xxx: Wallet errors
//! - 6xxx: Coupon errors
//! - 7xxx: Document errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the browser mirror can
/// switch on them without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// Caller identity missing
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Staff role required
    StaffRequired = 2003,

    // ==================== 4xxx: Order / Pricing ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no printable document
    OrderEmpty = 4007,
    /// Page range specification is malformed
    InvalidPageRange = 4101,
    /// Print selection is incomplete or out of range
    InvalidSelection = 4102,
    /// Delivery selected without an address
    DeliveryAddressRequired = 4103,
    /// Staple binding over the sheet cap
    StapleSheetCapExceeded = 4201,
    /// Rate table rejected on update
    RateTableInvalid = 4301,
    /// Order lost a race on wallet or coupon state
    OrderConflict = 4401,

    // ==================== 5xxx: Wallet ====================
    /// Wallet does not cover the requested debit
    InsufficientWalletBalance = 5002,
    /// Wallet amount must be positive and finite
    WalletInvalidAmount = 5003,

    // ==================== 6xxx: Coupon ====================
    /// Coupon not found
    CouponNotFound = 6001,
    /// Coupon code is malformed
    CouponMalformed = 6002,
    /// Coupon is not active
    CouponInactive = 6003,
    /// Coupon validity window has not started
    CouponNotYetValid = 6004,
    /// Coupon has expired
    CouponExpired = 6005,
    /// Coupon usage limit reached
    CouponUsageLimitReached = 6006,
    /// Order below the coupon minimum
    CouponMinOrderNotMet = 6007,
    /// Coupon record has invalid terms
    CouponInvalidTerms = 6008,

    // ==================== 7xxx: Document ====================
    /// File too large
    FileTooLarge = 7001,
    /// Unsupported file format
    UnsupportedFileFormat = 7002,
    /// Document could not be parsed
    InvalidDocument = 7003,
    /// No file provided in request
    NoFileProvided = 7004,
    /// Empty file provided
    EmptyFile = 7005,
    /// Too many files in one order
    TooManyFiles = 7006,
    /// File storage failed
    FileStorageFailed = 7007,
    /// Page count did not come from server-side inspection
    UntrustedDocument = 7008,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Pricing invariant violated (NaN, negative rate, missing rate)
    PricingInvariantViolated = 9101,

    // ==================== 94xx: Storage ====================
    /// Storage full (disk space insufficient)
    StorageFull = 9401,
    /// Storage corrupted (data file damaged)
    StorageCorrupted = 9403,
    /// System busy (IO error, retry later)
    SystemBusy = 9404,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::StaffRequired => "Staff role is required",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order has no printable pages",
            ErrorCode::InvalidPageRange => "Invalid page range",
            ErrorCode::InvalidSelection => "Invalid print selection",
            ErrorCode::DeliveryAddressRequired => "Delivery address is required",
            ErrorCode::StapleSheetCapExceeded => "Too many sheets for staple binding",
            ErrorCode::RateTableInvalid => "Rate table is invalid",
            ErrorCode::OrderConflict => "Order conflicted with a concurrent update",

            // Wallet
            ErrorCode::InsufficientWalletBalance => "Insufficient wallet balance",
            ErrorCode::WalletInvalidAmount => "Wallet amount must be positive",

            // Coupon
            ErrorCode::CouponNotFound => "Coupon not found",
            ErrorCode::CouponMalformed => "Coupon code is malformed",
            ErrorCode::CouponInactive => "Coupon is not active",
            ErrorCode::CouponNotYetValid => "Coupon is not valid yet",
            ErrorCode::CouponExpired => "Coupon has expired",
            ErrorCode::CouponUsageLimitReached => "Coupon usage limit reached",
            ErrorCode::CouponMinOrderNotMet => "Order amount is below the coupon minimum",
            ErrorCode::CouponInvalidTerms => "Coupon has invalid terms",

            // Document
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidDocument => "Document could not be read",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::TooManyFiles => "Too many files",
            ErrorCode::FileStorageFailed => "File storage failed",
            ErrorCode::UntrustedDocument => "Document metadata was not verified by the server",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::PricingInvariantViolated => "Pricing failed an internal consistency check",

            // Storage
            ErrorCode::StorageFull => "Storage full (disk space insufficient)",
            ErrorCode::StorageCorrupted => "Storage corrupted (data file damaged)",
            ErrorCode::SystemBusy => "System busy, please retry later",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::StaffRequired),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4007 => Ok(ErrorCode::OrderEmpty),
            4101 => Ok(ErrorCode::InvalidPageRange),
            4102 => Ok(ErrorCode::InvalidSelection),
            4103 => Ok(ErrorCode::DeliveryAddressRequired),
            4201 => Ok(ErrorCode::StapleSheetCapExceeded),
            4301 => Ok(ErrorCode::RateTableInvalid),
            4401 => Ok(ErrorCode::OrderConflict),

            // Wallet
            5002 => Ok(ErrorCode::InsufficientWalletBalance),
            5003 => Ok(ErrorCode::WalletInvalidAmount),

            // Coupon
            6001 => Ok(ErrorCode::CouponNotFound),
            6002 => Ok(ErrorCode::CouponMalformed),
            6003 => Ok(ErrorCode::CouponInactive),
            6004 => Ok(ErrorCode::CouponNotYetValid),
            6005 => Ok(ErrorCode::CouponExpired),
            6006 => Ok(ErrorCode::CouponUsageLimitReached),
            6007 => Ok(ErrorCode::CouponMinOrderNotMet),
            6008 => Ok(ErrorCode::CouponInvalidTerms),

            // Document
            7001 => Ok(ErrorCode::FileTooLarge),
            7002 => Ok(ErrorCode::UnsupportedFileFormat),
            7003 => Ok(ErrorCode::InvalidDocument),
            7004 => Ok(ErrorCode::NoFileProvided),
            7005 => Ok(ErrorCode::EmptyFile),
            7006 => Ok(ErrorCode::TooManyFiles),
            7007 => Ok(ErrorCode::FileStorageFailed),
            7008 => Ok(ErrorCode::UntrustedDocument),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::PricingInvariantViolated),

            // Storage
            9401 => Ok(ErrorCode::StorageFull),
            9403 => Ok(ErrorCode::StorageCorrupted),
            9404 => Ok(ErrorCode::SystemBusy),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
