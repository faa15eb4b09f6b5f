//! Wallet API Handlers

use axum::extract::State;
use serde::Serialize;
use shared::models::{Wallet, WalletCredit};
use shared::util::now_millis;
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::api::extract::AppJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;

const DEFAULT_CREDIT_DESCRIPTION: &str = "Wallet top-up";

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    balance: f64,
}

#[derive(Debug, Serialize)]
pub struct WalletResponse {
    wallet: Wallet,
}

/// GET /wallet/balance
pub async fn balance(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<ApiResponse<BalanceResponse>> {
    let wallet = state.store.wallet(&current_user.id)?;
    Ok(ApiResponse::success(BalanceResponse {
        balance: wallet.balance,
    }))
}

/// GET /wallet - balance plus ledger
pub async fn get_wallet(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<ApiResponse<WalletResponse>> {
    let wallet = state.store.wallet(&current_user.id)?;
    Ok(ApiResponse::success(WalletResponse { wallet }))
}

/// POST /wallet/credit - top up a customer's wallet (staff)
pub async fn credit(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    AppJson(payload): AppJson<WalletCredit>,
) -> AppResult<ApiResponse<BalanceResponse>> {
    if payload.user_id.trim().is_empty() {
        return Err(AppError::with_message(ErrorCode::RequiredField, "userId is required")
            .with_detail("field", "userId"));
    }
    let description = payload
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(DEFAULT_CREDIT_DESCRIPTION);
    let wallet = state
        .store
        .credit_wallet(&payload.user_id, payload.amount, description, now_millis())?;

    tracing::info!(
        operator = %current_user.id,
        user_id = %wallet.user_id,
        amount = payload.amount,
        balance = wallet.balance,
        "Wallet credited"
    );

    Ok(ApiResponse::success(BalanceResponse {
        balance: wallet.balance,
    }))
}
