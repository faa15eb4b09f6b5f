//! Print Order Model

use serde::{Deserialize, Serialize};

use super::breakdown::PriceBreakdown;
use super::document::{DeclaredDocument, DocumentFile};
use super::selection::PrintSelection;
use crate::types::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

/// Placed print order
///
/// `pricing` is only ever written by the calculator, never hand-edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub user_id: String,
    pub selection: PrintSelection,
    /// Server-inspected file metadata the order was priced from
    pub files: Vec<DocumentFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub use_wallet: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    pub pricing: PriceBreakdown,
    pub rate_table_version: u64,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub edit_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// `data` part of `POST /order/print`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(flatten)]
    pub selection: PrintSelection,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub use_wallet: bool,
    #[serde(default)]
    pub delivery_address: Option<String>,
    /// What the browser estimate showed; logged, never trusted
    #[serde(default)]
    pub client_total: Option<f64>,
}

/// Advisory estimate for page counts the customer declares
///
/// Runs the same calculator as order placement; nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    #[serde(flatten)]
    pub selection: PrintSelection,
    #[serde(default)]
    pub documents: Vec<DeclaredDocument>,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub use_wallet: bool,
}

/// Staff edit payload: a new selection, priced again from scratch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEdit {
    #[serde(flatten)]
    pub selection: PrintSelection,
    /// Replaces the stored address when present
    #[serde(default)]
    pub delivery_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::selection::{Binding, Fulfillment, PrintMode};

    #[test]
    fn test_request_flattens_selection() {
        let request: OrderRequest = serde_json::from_str(
            r#"{
                "mode": "BW",
                "side": "Double",
                "paperSize": "A4",
                "copies": 3,
                "binding": "Spiral",
                "bindingQuantity": 3,
                "fulfillment": "Delivery",
                "couponCode": "save20",
                "useWallet": true,
                "deliveryAddress": "12 Park Street",
                "clientTotal": 1.0,
                "totalAmount": 0.01
            }"#,
        )
        .unwrap();
        assert_eq!(request.selection.mode, PrintMode::Bw);
        assert_eq!(request.selection.binding, Binding::Spiral);
        assert_eq!(request.selection.fulfillment, Fulfillment::Delivery);
        assert_eq!(request.coupon_code.as_deref(), Some("save20"));
        assert!(request.use_wallet);
        assert_eq!(request.client_total, Some(1.0));
    }

    #[test]
    fn test_payment_status_default() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Unpaid);
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Unpaid).unwrap(),
            "\"unpaid\""
        );
    }
}
