//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::OrderNotFound | Self::CouponNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict (lost a race, caller resubmits)
            Self::AlreadyExists | Self::OrderConflict | Self::InsufficientWalletBalance => {
                StatusCode::CONFLICT
            }

            // 401 Unauthorized
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::StaffRequired => StatusCode::FORBIDDEN,

            // 413 Payload Too Large
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            // 422 Unprocessable Entity (policy rejections)
            Self::StapleSheetCapExceeded
            | Self::CouponInactive
            | Self::CouponNotYetValid
            | Self::CouponExpired
            | Self::CouponUsageLimitReached
            | Self::CouponMinOrderNotMet => StatusCode::UNPROCESSABLE_ENTITY,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::TimeoutError | Self::SystemBusy => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError
            | Self::PricingInvariantViolated
            | Self::FileStorageFailed
            | Self::StorageFull
            | Self::StorageCorrupted => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Policy rejections are business outcomes the client reacts to,
    /// not faults
    pub fn is_policy_rejection(&self) -> bool {
        self.http_status() == StatusCode::UNPROCESSABLE_ENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::OrderNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::CouponNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::AlreadyExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::OrderConflict.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::InsufficientWalletBalance.http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_auth_and_permission_status() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::StaffRequired.http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_policy_rejection_status() {
        for code in [
            ErrorCode::StapleSheetCapExceeded,
            ErrorCode::CouponInactive,
            ErrorCode::CouponNotYetValid,
            ErrorCode::CouponExpired,
            ErrorCode::CouponUsageLimitReached,
            ErrorCode::CouponMinOrderNotMet,
        ] {
            assert_eq!(code.http_status(), StatusCode::UNPROCESSABLE_ENTITY);
            assert!(code.is_policy_rejection());
        }
        assert!(!ErrorCode::InvalidPageRange.is_policy_rejection());
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::PricingInvariantViolated.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::SystemBusy.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_bad_request_status() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidPageRange.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::CouponMalformed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::UnsupportedFileFormat.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::FileTooLarge.http_status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
