//! Order API Handlers

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Path, State};
use http::StatusCode;
use serde::Serialize;
use shared::models::{DocumentFile, Order, OrderEdit, OrderRequest, PriceBreakdown};
use shared::util::now_millis;
use shared::{ApiResponse, AppError, AppResult, ErrorCode};

use crate::api::extract::{AppJson, parse_json_part};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::documents::inspect_upload;

/// Multipart field carrying the order JSON
const DATA_FIELD: &str = "data";
/// Accepted names for document parts
const FILE_FIELDS: &[&str] = &["files[]", "files", "file"];
/// Name used when the browser sends no file name
const UNNAMED_FILE: &str = "document";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    order_id: String,
    pricing: PriceBreakdown,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    order: Order,
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    orders: Vec<Order>,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::with_message(ErrorCode::FileTooLarge, e.body_text())
    } else {
        AppError::invalid_request(format!("Invalid multipart request: {}", e.body_text()))
    }
}

/// Raw parts of an order form, before inspection
struct OrderForm {
    request: OrderRequest,
    uploads: Vec<(String, Bytes)>,
}

async fn read_order_form(mut multipart: Multipart, max_files: usize) -> AppResult<OrderForm> {
    let mut request = None;
    let mut uploads = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == DATA_FIELD {
            let text = field.text().await.map_err(multipart_error)?;
            request = Some(parse_json_part::<OrderRequest>(DATA_FIELD, &text)?);
        } else if FILE_FIELDS.contains(&name.as_str()) {
            if uploads.len() == max_files {
                return Err(AppError::with_message(
                    ErrorCode::TooManyFiles,
                    format!("At most {} files per order", max_files),
                )
                .with_detail("limit", max_files));
            }
            let file_name = field
                .file_name()
                .map(str::to_string)
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNNAMED_FILE.to_string());
            let bytes = field.bytes().await.map_err(multipart_error)?;
            uploads.push((file_name, bytes));
        } else {
            tracing::debug!(field = %name, "Ignoring unknown multipart field");
        }
    }

    let request = request.ok_or_else(|| {
        AppError::with_message(ErrorCode::RequiredField, "Missing 'data' field")
            .with_detail("field", DATA_FIELD)
    })?;

    Ok(OrderForm { request, uploads })
}

/// POST /order/print - upload documents and place an order
///
/// Page counts come from the uploaded bytes; any totals in `data` are
/// ignored.
pub async fn place(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> AppResult<ApiResponse<PlaceOrderResponse>> {
    let form = read_order_form(multipart, state.config.max_files_per_order).await?;

    let mut files: Vec<DocumentFile> = Vec::with_capacity(form.uploads.len());
    let mut accepted = Vec::with_capacity(form.uploads.len());
    for (name, bytes) in form.uploads {
        let file = inspect_upload(name, bytes.clone(), state.config.max_upload_bytes).await?;
        if let Some(hash) = &file.content_hash {
            accepted.push((hash.clone(), bytes));
        }
        files.push(file);
    }

    let order = state
        .reconciler
        .place_order(&current_user.id, form.request, files, now_millis())?;

    // only committed orders keep their uploads
    for (hash, bytes) in accepted {
        if let Err(e) = state.file_store.put(&hash, &bytes).await {
            tracing::error!(
                order_id = %order.order_id,
                hash = %hash,
                error = %e,
                "Upload not stored for placed order"
            );
            return Err(AppError::from(e).with_detail("orderId", order.order_id));
        }
    }

    Ok(ApiResponse::success(PlaceOrderResponse {
        order_id: order.order_id,
        pricing: order.pricing,
    }))
}

/// GET /order/{orderId} - one order (owner or staff)
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(order_id): Path<String>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = state.reconciler.order(&order_id)?;
    current_user.ensure_can_view(&order.user_id)?;
    Ok(ApiResponse::success(OrderResponse { order }))
}

/// GET /order - the caller's orders, oldest first
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<ApiResponse<OrderListResponse>> {
    let orders = state.reconciler.orders_for_user(&current_user.id)?;
    Ok(ApiResponse::success(OrderListResponse { orders }))
}

/// POST /order/edit/{orderId} - re-price with a new selection (staff)
pub async fn edit(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(order_id): Path<String>,
    AppJson(payload): AppJson<OrderEdit>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = state.reconciler.edit_order(&order_id, payload, now_millis())?;

    tracing::info!(
        order_id = %order.order_id,
        operator = %current_user.id,
        edit_count = order.edit_count,
        "Order edited by staff"
    );

    Ok(ApiResponse::success_with_message(
        "Order updated, payment reset to unpaid",
        OrderResponse { order },
    ))
}
