//! Request extractors with envelope-shaped rejections

use axum::extract::{FromRequest, Request};
use axum::extract::rejection::JsonRejection;
use serde::de::DeserializeOwned;
use shared::AppError;

/// `axum::Json` whose rejection is an [`AppError`]
///
/// Malformed bodies come back as `{success:false, code:5, message}` instead
/// of axum's plain-text rejection.
#[derive(Debug, Clone)]
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    AppError::invalid_request(rejection.body_text())
}

/// Parse one JSON text part (the `data` field of a multipart form)
pub fn parse_json_part<T: DeserializeOwned>(field: &str, text: &str) -> Result<T, AppError> {
    serde_json::from_str(text).map_err(|e| {
        AppError::invalid_request(format!("Invalid JSON in '{}': {}", field, e))
            .with_detail("field", field)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;
    use shared::models::OrderRequest;

    #[test]
    fn test_parse_json_part() {
        let request: OrderRequest = parse_json_part(
            "data",
            r#"{"mode":"BW","side":"Single","paperSize":"A4","copies":1}"#,
        )
        .unwrap();
        assert_eq!(request.selection.copies, 1);

        let err = parse_json_part::<OrderRequest>("data", "{not json").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(err.details.unwrap().get("field").unwrap(), "data");
    }
}
