//! Caller identity
//!
//! Authentication happens upstream. The gateway forwards the caller as two
//! headers, which are trusted as-is:
//!
//! | Header | Value |
//! |--------|-------|
//! | `x-user-id` | customer or staff id |
//! | `x-user-role` | `customer` (default) or `staff` |
//!
//! - [`CurrentUser`] - extractor for handlers
//! - [`require_staff`] - middleware for staff-only routes

pub mod extractor;
pub mod middleware;

use http::HeaderMap;
use shared::AppError;
use shared::types::UserRole;

pub use middleware::require_staff;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Read the gateway headers; `None` without a usable user id
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let id = headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())?;
        let role = headers
            .get(USER_ROLE_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(UserRole::from_header)
            .unwrap_or_default();

        Some(Self {
            id: id.to_string(),
            role,
        })
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Owners see their own records, staff see everything
    pub fn ensure_can_view(&self, owner_id: &str) -> Result<(), AppError> {
        if self.is_staff() || self.id == owner_id {
            Ok(())
        } else {
            Err(AppError::permission_denied("Not your order"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, v.parse().unwrap());
        }
        map
    }

    #[test]
    fn test_from_headers() {
        let user = CurrentUser::from_headers(&headers(&[
            (USER_ID_HEADER, " u-42 "),
            (USER_ROLE_HEADER, "staff"),
        ]))
        .unwrap();
        assert_eq!(user.id, "u-42");
        assert!(user.is_staff());

        let user = CurrentUser::from_headers(&headers(&[(USER_ID_HEADER, "u-1")])).unwrap();
        assert_eq!(user.role, UserRole::Customer);

        assert!(CurrentUser::from_headers(&headers(&[(USER_ID_HEADER, "  ")])).is_none());
        assert!(CurrentUser::from_headers(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_view_rights() {
        let customer = CurrentUser {
            id: "u-1".to_string(),
            role: UserRole::Customer,
        };
        assert!(customer.ensure_can_view("u-1").is_ok());
        let err = customer.ensure_can_view("u-2").unwrap_err();
        assert_eq!(err.code, shared::ErrorCode::PermissionDenied);

        let staff = CurrentUser {
            id: "s-1".to_string(),
            role: UserRole::Staff,
        };
        assert!(staff.ensure_can_view("u-2").is_ok());
    }
}
