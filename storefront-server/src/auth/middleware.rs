//! Staff gate middleware

use axum::{extract::Request, middleware::Next, response::Response};
use shared::AppError;

use crate::auth::CurrentUser;
use crate::security_log;

/// Reject the request unless the gateway marked the caller as staff
///
/// Injects [`CurrentUser`] into the request extensions on success.
pub async fn require_staff(mut req: Request, next: Next) -> Result<Response, AppError> {
    let Some(user) = CurrentUser::from_headers(req.headers()) else {
        security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
        return Err(AppError::not_authenticated());
    };

    if !user.is_staff() {
        security_log!(
            "WARN",
            "staff_required",
            user_id = user.id.clone(),
            uri = format!("{:?}", req.uri())
        );
        return Err(AppError::staff_required());
    }

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
