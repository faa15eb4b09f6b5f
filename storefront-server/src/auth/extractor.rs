//! Header Extractor
//!
//! `CurrentUser` for routes that need a caller, `Option<CurrentUser>` for
//! routes that only personalize the answer.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use http::request::Parts;
use shared::AppError;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::security_log;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        match CurrentUser::from_headers(&parts.headers) {
            Some(user) => {
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            None => {
                security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
                Err(AppError::not_authenticated())
            }
        }
    }
}

impl OptionalFromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(CurrentUser::from_headers(&parts.headers))
    }
}
