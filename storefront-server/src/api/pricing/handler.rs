//! Pricing API Handlers

use axum::extract::State;
use serde::Serialize;
use shared::models::{
    AdditionalRates, DeliveryTier, EstimateRequest, PriceBreakdown, PrintRates, RateTable,
    RateTableUpdate,
};
use shared::pricing::PageAccounting;
use shared::util::now_millis;
use shared::{ApiResponse, AppResult};

use crate::api::extract::AppJson;
use crate::auth::CurrentUser;
use crate::core::ServerState;

/// The rule set the browser estimate mirrors
#[derive(Debug, Serialize)]
pub struct RateRules {
    pub printing: PrintRates,
    pub additional: AdditionalRates,
    pub delivery_tiers: Vec<DeliveryTier>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingView {
    pub version: u64,
    pub updated_at: i64,
    pub rules: RateRules,
}

impl From<RateTable> for PricingView {
    fn from(table: RateTable) -> Self {
        Self {
            version: table.version,
            updated_at: table.updated_at,
            rules: RateRules {
                printing: table.printing,
                additional: table.additional,
                delivery_tiers: table.delivery_tiers,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PricingResponse {
    pricing: PricingView,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pricing: PriceBreakdown,
    accounting: PageAccounting,
}

/// GET /pricing - current rate table
pub async fn get_pricing(State(state): State<ServerState>) -> AppResult<ApiResponse<PricingResponse>> {
    let table = state.store.rate_table()?;
    Ok(ApiResponse::success(PricingResponse {
        pricing: table.into(),
    }))
}

/// PUT /pricing - replace the rate table (staff)
pub async fn update_pricing(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    AppJson(payload): AppJson<RateTableUpdate>,
) -> AppResult<ApiResponse<PricingResponse>> {
    let table = state.store.put_rate_table(payload, now_millis())?;

    tracing::info!(
        operator = %current_user.id,
        version = table.version,
        "Rate table replaced"
    );

    Ok(ApiResponse::success_with_message(
        "Rate table updated",
        PricingResponse {
            pricing: table.into(),
        },
    ))
}

/// POST /pricing/estimate - advisory price for declared page counts
pub async fn estimate(
    State(state): State<ServerState>,
    current_user: Option<CurrentUser>,
    AppJson(payload): AppJson<EstimateRequest>,
) -> AppResult<ApiResponse<EstimateResponse>> {
    let user_id = current_user.as_ref().map(|u| u.id.as_str());
    let quote = state.reconciler.estimate(user_id, &payload, now_millis())?;

    Ok(ApiResponse::success(EstimateResponse {
        pricing: quote.breakdown,
        accounting: quote.accounting,
    }))
}
