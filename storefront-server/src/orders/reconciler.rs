//! OrderReconciler - authoritative pricing and order commit
//!
//! # Placement flow
//!
//! ```text
//! place_order(user, request, files)
//!     ├─ prepare_order
//!     │   ├─ 1. Reject missing or untrusted files, missing delivery address
//!     │   ├─ 2. Snapshot rate table + coupon + wallet (one read transaction)
//!     │   └─ 3. price_order on that snapshot
//!     └─ commit_order
//!         ├─ 4. Begin write transaction
//!         ├─ 5. Next order id
//!         ├─ 6. Debit exactly walletUsed (fails below zero)
//!         ├─ 7. Count the coupon use (fails at the limit)
//!         ├─ 8. Insert order
//!         └─ 9. Commit
//! ```
//!
//! A failure at any of steps 4-9 drops the write transaction, so nothing is
//! debited, counted or stored. Client-sent totals never enter the price.

use rust_decimal::Decimal;
use shared::models::{
    Coupon, DocumentFile, EstimateRequest, Fulfillment, Order, OrderEdit, OrderRequest,
    PaymentStatus, PriceBreakdown, PrintSelection,
};
use shared::pricing::money::{to_decimal, to_f64};
use shared::pricing::{CouponUse, PageAccounting, PricingInput, Quote, quote};
use shared::types::Timestamp;

use super::error::{OrderError, OrderResult};
use crate::store::{PricingSnapshot, Store, StoreError};

/// Gap between the browser's total and ours that is worth a warning
const CLIENT_TOTAL_TOLERANCE: f64 = 0.005;

/// Result of pricing an order against one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub breakdown: PriceBreakdown,
    pub accounting: PageAccounting,
    pub rate_table_version: u64,
    /// Upper-cased code of the coupon being redeemed
    pub coupon_code: Option<String>,
}

/// An order priced and ready to commit
#[derive(Debug, Clone)]
pub struct PricedOrder {
    pub user_id: String,
    pub request: OrderRequest,
    pub files: Vec<DocumentFile>,
    pub reconciled: Reconciled,
}

fn normalized_coupon(raw: Option<&str>) -> OrderResult<Option<String>> {
    match raw.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => Ok(Some(Coupon::normalize_code(code)?)),
        None => Ok(None),
    }
}

fn require_address(selection: &PrintSelection, address: Option<&str>) -> OrderResult<()> {
    if selection.fulfillment == Fulfillment::Delivery
        && address.is_none_or(|a| a.trim().is_empty())
    {
        return Err(OrderError::DeliveryAddressRequired);
    }
    Ok(())
}

/// The stored coupon for `code`, or `CouponNotFound`
fn snapshot_coupon<'a>(
    code: Option<&str>,
    snapshot: &'a PricingSnapshot,
) -> OrderResult<Option<&'a Coupon>> {
    match (code, snapshot.coupon.as_ref()) {
        (Some(code), None) => Err(OrderError::CouponNotFound(code.to_string())),
        (_, coupon) => Ok(coupon),
    }
}

fn log_failure(action: &'static str, subject: &str, err: &OrderError) {
    if err.is_internal() {
        tracing::error!(action, subject = %subject, error = %err, "Order pricing failed");
    } else if matches!(err, OrderError::Pricing(e) if e.code().is_policy_rejection()) {
        tracing::info!(action, subject = %subject, error = %err, "Order declined by policy");
    } else {
        tracing::warn!(action, subject = %subject, error = %err, "Order rejected");
    }
}

/// Server-side pricing and order persistence
#[derive(Debug, Clone)]
pub struct OrderReconciler {
    store: Store,
}

impl OrderReconciler {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Re-derive the full price from server-held state only
    ///
    /// Pure with respect to the store: reads one snapshot, writes nothing.
    pub fn reconcile(
        &self,
        user_id: &str,
        request: &OrderRequest,
        files: &[DocumentFile],
        now: Timestamp,
    ) -> OrderResult<Reconciled> {
        request.selection.validate()?;
        if let Some(file) = files.iter().find(|f| !f.server_trusted) {
            return Err(OrderError::UntrustedDocument(file.name.clone()));
        }

        let coupon_code = normalized_coupon(request.coupon_code.as_deref())?;
        let snapshot = self.store.snapshot(user_id, coupon_code.as_deref())?;
        let coupon = snapshot_coupon(coupon_code.as_deref(), &snapshot)?
            .map_or(CouponUse::None, CouponUse::Redeem);

        let quote = quote(&PricingInput {
            selection: &request.selection,
            files,
            rates: &snapshot.rates,
            coupon,
            wallet_balance: request.use_wallet.then_some(snapshot.wallet.balance),
            now,
        })?;

        tracing::debug!(
            user_id = %user_id,
            pages = quote.accounting.billable_pages_after_range,
            sheets = quote.accounting.billable_sheets,
            total = quote.breakdown.total_amount,
            rate_table_version = snapshot.rates.version,
            "Order reconciled"
        );

        Ok(Reconciled {
            breakdown: quote.breakdown,
            accounting: quote.accounting,
            rate_table_version: snapshot.rates.version,
            coupon_code,
        })
    }

    /// Validate and price an order without touching the store
    pub fn prepare_order(
        &self,
        user_id: &str,
        request: OrderRequest,
        files: Vec<DocumentFile>,
        now: Timestamp,
    ) -> OrderResult<PricedOrder> {
        if files.is_empty() {
            return Err(OrderError::NoFiles);
        }
        require_address(&request.selection, request.delivery_address.as_deref())?;

        let reconciled = self.reconcile(user_id, &request, &files, now)?;
        if reconciled.accounting.is_empty() {
            return Err(OrderError::Empty);
        }

        if let Some(client_total) = request.client_total {
            let total = reconciled.breakdown.total_amount;
            if (client_total - total).abs() > CLIENT_TOTAL_TOLERANCE {
                tracing::warn!(
                    user_id = %user_id,
                    client_total,
                    total,
                    "Client estimate differs from the server price, using the server price"
                );
            }
        }

        Ok(PricedOrder {
            user_id: user_id.to_string(),
            request,
            files,
            reconciled,
        })
    }

    /// Debit, count and insert in one write transaction
    pub fn commit_order(&self, priced: PricedOrder, now: Timestamp) -> OrderResult<Order> {
        let PricedOrder {
            user_id,
            request,
            files,
            reconciled,
        } = priced;
        let breakdown = reconciled.breakdown;

        let txn = self.store.begin_write()?;
        let order_id = self.store.next_order_id(&txn, now)?;

        if breakdown.wallet_used > 0.0 {
            self.store.debit_wallet_if_sufficient(
                &txn,
                &user_id,
                breakdown.wallet_used,
                &format!("Payment for order {order_id}"),
                &order_id,
                now,
            )?;
        }
        if let Some(code) = &reconciled.coupon_code {
            self.store.increment_coupon_if_below_limit(&txn, code)?;
        }

        let order = Order {
            order_id,
            user_id,
            selection: request.selection,
            files,
            coupon_code: reconciled.coupon_code,
            use_wallet: request.use_wallet,
            delivery_address: request.delivery_address,
            pricing: breakdown,
            rate_table_version: reconciled.rate_table_version,
            payment_status: PaymentStatus::Unpaid,
            edit_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_order(&txn, &order)?;
        txn.commit().map_err(StoreError::from)?;

        Ok(order)
    }

    /// Price and persist a new order
    pub fn place_order(
        &self,
        user_id: &str,
        request: OrderRequest,
        files: Vec<DocumentFile>,
        now: Timestamp,
    ) -> OrderResult<Order> {
        let result = self
            .prepare_order(user_id, request, files, now)
            .and_then(|priced| self.commit_order(priced, now));

        match &result {
            Ok(order) => tracing::info!(
                order_id = %order.order_id,
                user_id = %user_id,
                total = order.pricing.total_amount,
                wallet_used = order.pricing.wallet_used,
                coupon = ?order.coupon_code,
                "Order placed"
            ),
            Err(e) => log_failure("place_order", user_id, e),
        }
        result
    }

    /// Staff edit: re-run the calculator with a new selection
    ///
    /// Uses the order's stored files, the current rate table and the coupon's
    /// terms without re-checking its gate or counting it again. Wallet usage
    /// can only shrink; the difference goes back to the wallet. Payment
    /// status returns to unpaid.
    pub fn edit_order(&self, order_id: &str, edit: OrderEdit, now: Timestamp) -> OrderResult<Order> {
        let result = self.try_edit_order(order_id, edit, now);
        if let Err(e) = &result {
            log_failure("edit_order", order_id, e);
        }
        result
    }

    fn try_edit_order(&self, order_id: &str, edit: OrderEdit, now: Timestamp) -> OrderResult<Order> {
        edit.selection.validate()?;

        let txn = self.store.begin_write()?;
        let existing = self
            .store
            .order_txn(&txn, order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;

        let delivery_address = edit
            .delivery_address
            .filter(|a| !a.trim().is_empty())
            .or_else(|| existing.delivery_address.clone());
        require_address(&edit.selection, delivery_address.as_deref())?;

        let snapshot =
            self.store
                .snapshot_txn(&txn, &existing.user_id, existing.coupon_code.as_deref())?;
        let coupon = snapshot_coupon(existing.coupon_code.as_deref(), &snapshot)?
            .map_or(CouponUse::None, CouponUse::Reapply);

        let previously_debited = existing.pricing.wallet_used;
        let quote = quote(&PricingInput {
            selection: &edit.selection,
            files: &existing.files,
            rates: &snapshot.rates,
            coupon,
            wallet_balance: existing.use_wallet.then_some(previously_debited),
            now,
        })?;
        if quote.accounting.is_empty() {
            return Err(OrderError::Empty);
        }

        let refund = to_decimal(previously_debited, "previous walletUsed")?
            - to_decimal(quote.breakdown.wallet_used, "walletUsed")?;
        if refund > Decimal::ZERO {
            self.store.credit_wallet_txn(
                &txn,
                &existing.user_id,
                to_f64(refund),
                &format!("Refund for edited order {order_id}"),
                Some(order_id),
                now,
            )?;
        }

        let old_total = existing.pricing.total_amount;
        let order = Order {
            selection: edit.selection,
            delivery_address,
            pricing: quote.breakdown,
            rate_table_version: snapshot.rates.version,
            payment_status: PaymentStatus::Unpaid,
            edit_count: existing.edit_count + 1,
            updated_at: now,
            ..existing
        };
        self.store.replace_order(&txn, &order)?;
        txn.commit().map_err(StoreError::from)?;

        tracing::info!(
            order_id = %order_id,
            old_total,
            new_total = order.pricing.total_amount,
            wallet_refund = to_f64(refund.max(Decimal::ZERO)),
            "Order re-priced"
        );
        Ok(order)
    }

    /// Advisory price for declared page counts; never persisted
    pub fn estimate(
        &self,
        user_id: Option<&str>,
        request: &EstimateRequest,
        now: Timestamp,
    ) -> OrderResult<Quote> {
        let files: Vec<DocumentFile> = request
            .documents
            .iter()
            .cloned()
            .map(DocumentFile::from)
            .collect();
        let coupon_code = normalized_coupon(request.coupon_code.as_deref())?;
        let snapshot = self
            .store
            .snapshot(user_id.unwrap_or_default(), coupon_code.as_deref())?;
        let coupon = snapshot_coupon(coupon_code.as_deref(), &snapshot)?
            .map_or(CouponUse::None, CouponUse::Redeem);
        let wallet_balance = (request.use_wallet && user_id.is_some()).then_some(snapshot.wallet.balance);

        Ok(quote(&PricingInput {
            selection: &request.selection,
            files: &files,
            rates: &snapshot.rates,
            coupon,
            wallet_balance,
            now,
        })?)
    }

    pub fn order(&self, order_id: &str) -> OrderResult<Order> {
        self.store
            .order(order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    pub fn orders_for_user(&self, user_id: &str) -> OrderResult<Vec<Order>> {
        Ok(self.store.orders_for_user(user_id)?)
    }
}
