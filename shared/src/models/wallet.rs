//! Wallet Model
//!
//! Store credit. `balance` is a cached value that always equals the signed
//! sum of `transactions`; both are updated together or not at all.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;
use crate::pricing::error::{PolicyRejection, PricingError, PricingResult};
use crate::pricing::money::{to_decimal, to_f64};
use crate::types::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Credit,
    Debit,
}

/// Append-only wallet ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Always positive; the sign comes from `kind`
    pub amount: f64,
    pub description: String,
    pub timestamp: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

impl WalletTransaction {
    fn signed_amount(&self) -> PricingResult<Decimal> {
        let amount = to_decimal(self.amount, "wallet transaction amount")?;
        Ok(match self.kind {
            TransactionType::Credit => amount,
            TransactionType::Debit => -amount,
        })
    }
}

/// Wallet entity (one per user)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub user_id: String,
    pub balance: f64,
    #[serde(default)]
    pub transactions: Vec<WalletTransaction>,
}

/// Staff top-up payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCredit {
    pub user_id: String,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
}

impl Wallet {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            balance: 0.0,
            transactions: Vec::new(),
        }
    }

    fn positive_amount(amount: f64) -> PricingResult<Decimal> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PricingError::validation(
                ErrorCode::WalletInvalidAmount,
                format!("wallet amount must be a positive number, got {amount}"),
            ));
        }
        let amount = to_decimal(amount, "wallet amount")?;
        if amount.scale() > 2 {
            return Err(PricingError::validation(
                ErrorCode::WalletInvalidAmount,
                format!("wallet amount has more than 2 decimal places: {amount}"),
            ));
        }
        Ok(amount)
    }

    /// Add funds and record a credit transaction
    pub fn credit(
        &mut self,
        amount: f64,
        description: impl Into<String>,
        order_id: Option<String>,
        now: Timestamp,
    ) -> PricingResult<()> {
        let amount = Self::positive_amount(amount)?;
        let balance = to_decimal(self.balance, "wallet balance")? + amount;
        self.push(TransactionType::Credit, amount, balance, description, order_id, now);
        Ok(())
    }

    /// Remove funds, refusing to go below zero
    pub fn debit(
        &mut self,
        amount: f64,
        description: impl Into<String>,
        order_id: Option<String>,
        now: Timestamp,
    ) -> PricingResult<()> {
        let requested = Self::positive_amount(amount)?;
        let current = to_decimal(self.balance, "wallet balance")?;
        if requested > current {
            return Err(PolicyRejection::InsufficientWalletBalance {
                balance: self.balance,
                requested: amount,
            }
            .into());
        }
        self.push(
            TransactionType::Debit,
            requested,
            current - requested,
            description,
            order_id,
            now,
        );
        Ok(())
    }

    fn push(
        &mut self,
        kind: TransactionType,
        amount: Decimal,
        balance: Decimal,
        description: impl Into<String>,
        order_id: Option<String>,
        now: Timestamp,
    ) {
        self.transactions.push(WalletTransaction {
            kind,
            amount: to_f64(amount),
            description: description.into(),
            timestamp: now,
            order_id,
        });
        self.balance = to_f64(balance);
    }

    /// Signed sum of the ledger
    pub fn ledger_balance(&self) -> PricingResult<f64> {
        let mut sum = Decimal::ZERO;
        for tx in &self.transactions {
            sum += tx.signed_amount()?;
        }
        Ok(to_f64(sum))
    }

    /// Whether the cached balance matches the ledger
    pub fn is_consistent(&self) -> bool {
        self.ledger_balance()
            .is_ok_and(|ledger| ledger == self.balance && self.balance >= 0.0)
    }
}
