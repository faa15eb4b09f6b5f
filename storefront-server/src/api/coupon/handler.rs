//! Coupon API Handlers

use axum::extract::State;
use serde::{Deserialize, Serialize};
use shared::models::{Coupon, CouponUpsert};
use shared::pricing::coupon_discount;
use shared::pricing::money::{non_negative, to_f64};
use shared::util::now_millis;
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::api::extract::AppJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;

/// Coupon preview payload
///
/// `orderAmount` is the subtotal the browser currently shows; the preview
/// is advisory and the order is re-priced on submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponRequest {
    pub code: String,
    #[serde(alias = "subtotal")]
    pub order_amount: f64,
}

#[derive(Debug, Serialize)]
pub struct ValidateCouponResponse {
    code: String,
    discount: f64,
}

#[derive(Debug, Serialize)]
pub struct CouponResponse {
    coupon: Coupon,
}

/// POST /coupon/validate - would this coupon apply, and for how much
pub async fn validate(
    State(state): State<ServerState>,
    AppJson(payload): AppJson<ValidateCouponRequest>,
) -> AppResult<ApiResponse<ValidateCouponResponse>> {
    let code = Coupon::normalize_code(&payload.code)?;
    let subtotal = non_negative(payload.order_amount, "orderAmount")
        .map_err(|e| AppError::with_message(ErrorCode::ValueOutOfRange, e.to_string()))?;

    let coupon = state.store.coupon(&code)?.ok_or_else(|| {
        AppError::with_message(ErrorCode::CouponNotFound, format!("Coupon {} not found", code))
            .with_detail("code", code.clone())
    })?;

    coupon.check_redeemable(payload.order_amount, now_millis())?;
    let discount = coupon_discount(subtotal, &coupon)?;

    Ok(ApiResponse::success(ValidateCouponResponse {
        code: coupon.code,
        discount: to_f64(discount),
    }))
}

/// POST /coupon - create or replace a coupon (staff)
pub async fn upsert(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    AppJson(payload): AppJson<CouponUpsert>,
) -> AppResult<ApiResponse<CouponResponse>> {
    let coupon = state.store.put_coupon(payload)?;

    tracing::info!(
        operator = %current_user.id,
        code = %coupon.code,
        used_count = coupon.used_count,
        "Coupon saved"
    );

    Ok(ApiResponse::success(CouponResponse { coupon }))
}
