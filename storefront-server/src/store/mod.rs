//! redb document store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `rate_table` | `"current"` | `RateTable` | Live pricing configuration |
//! | `coupons` | upper-cased code | `Coupon` | Coupon terms and usage count |
//! | `wallets` | user id | `Wallet` | Balance and ledger |
//! | `orders` | order id | `Order` | Priced orders |
//! | `user_orders` | user id | order id (multimap) | Per-customer index |
//! | `counters` | counter name | `u64` | Order number sequence |
//!
//! Values are JSON. Every read that feeds a pricing run comes from one read
//! transaction ([`Store::snapshot`]). Writes that must land together take a
//! `&WriteTransaction` and the caller commits; redb admits a single writer at
//! a time, so a condition checked inside a write transaction still holds at
//! commit.

mod error;

pub use error::{StoreError, StoreResult};

use redb::{
    Database, MultimapTableDefinition, ReadableDatabase, ReadableMultimapTable, ReadableTable,
    TableDefinition, WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{
    Coupon, CouponUpsert, Order, RateTable, RateTableUpdate, Wallet,
};
use shared::types::Timestamp;
use shared::util::day_stamp;
use std::path::Path;
use std::sync::Arc;

const RATE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("rate_table");
const COUPONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("coupons");
const WALLETS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("wallets");
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");
const USER_ORDERS_TABLE: MultimapTableDefinition<&str, &str> =
    MultimapTableDefinition::new("user_orders");
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

const CURRENT_RATE_KEY: &str = "current";
const ORDER_SEQ_KEY: &str = "order_seq";

/// Order ids are `PRN{yyyymmdd}{ORDER_NUMBER_BASE + n}`
const ORDER_NUMBER_BASE: u64 = 10000;

/// Everything one reconciliation reads, from a single read transaction
#[derive(Debug, Clone)]
pub struct PricingSnapshot {
    pub rates: RateTable,
    /// `None` when no coupon was asked for or the code is unknown
    pub coupon: Option<Coupon>,
    /// Empty wallet when the user has none yet
    pub wallet: Wallet,
}

fn get_json<T, R>(table: &R, key: &str) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<&'static str, &'static [u8]>,
{
    match table.get(key)? {
        Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
        None => Ok(None),
    }
}

fn put_json<T: Serialize>(
    table: &mut redb::Table<'_, &'static str, &'static [u8]>,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let bytes = serde_json::to_vec(value)?;
    table.insert(key, bytes.as_slice())?;
    Ok(())
}

/// Store backed by redb
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").finish_non_exhaustive()
    }
}

impl Store {
    /// Open or create the database file
    ///
    /// redb commits with `Durability::Immediate`: once `commit()` returns the
    /// change survives a crash, and the file is never left half-written.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// In-memory database for tests
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    /// Create every table and seed the reference rate table
    fn init(db: Database) -> StoreResult<Self> {
        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(COUPONS_TABLE)?;
            let _ = txn.open_table(WALLETS_TABLE)?;
            let _ = txn.open_table(ORDERS_TABLE)?;
            let _ = txn.open_multimap_table(USER_ORDERS_TABLE)?;
            let _ = txn.open_table(COUNTERS_TABLE)?;

            let mut rates = txn.open_table(RATE_TABLE)?;
            if rates.get(CURRENT_RATE_KEY)?.is_none() {
                put_json(&mut rates, CURRENT_RATE_KEY, &RateTable::default())?;
            }
        }
        txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction; dropping it without `commit()` aborts
    pub fn begin_write(&self) -> StoreResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Cheap liveness probe
    pub fn ping(&self) -> StoreResult<()> {
        let txn = self.db.begin_read()?;
        let _ = txn.open_table(RATE_TABLE)?;
        Ok(())
    }

    // ========== Pricing snapshot ==========

    /// Rate table, coupon and wallet as of one instant
    pub fn snapshot(&self, user_id: &str, coupon_code: Option<&str>) -> StoreResult<PricingSnapshot> {
        let txn = self.db.begin_read()?;

        let rates = get_json(&txn.open_table(RATE_TABLE)?, CURRENT_RATE_KEY)?
            .ok_or(StoreError::MissingRateTable)?;
        let coupon = match coupon_code {
            Some(code) => get_json(&txn.open_table(COUPONS_TABLE)?, code)?,
            None => None,
        };
        let wallet = get_json(&txn.open_table(WALLETS_TABLE)?, user_id)?
            .unwrap_or_else(|| Wallet::new(user_id));

        Ok(PricingSnapshot {
            rates,
            coupon,
            wallet,
        })
    }

    /// [`Store::snapshot`] inside a write transaction, for re-pricing that
    /// commits in the same transaction
    pub fn snapshot_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
        coupon_code: Option<&str>,
    ) -> StoreResult<PricingSnapshot> {
        let rates = get_json(&txn.open_table(RATE_TABLE)?, CURRENT_RATE_KEY)?
            .ok_or(StoreError::MissingRateTable)?;
        let coupon = match coupon_code {
            Some(code) => get_json(&txn.open_table(COUPONS_TABLE)?, code)?,
            None => None,
        };
        let wallet = get_json(&txn.open_table(WALLETS_TABLE)?, user_id)?
            .unwrap_or_else(|| Wallet::new(user_id));

        Ok(PricingSnapshot {
            rates,
            coupon,
            wallet,
        })
    }

    // ========== Rate table ==========

    pub fn rate_table(&self) -> StoreResult<RateTable> {
        let txn = self.db.begin_read()?;
        get_json(&txn.open_table(RATE_TABLE)?, CURRENT_RATE_KEY)?
            .ok_or(StoreError::MissingRateTable)
    }

    /// Replace the rate table, bumping its version
    ///
    /// Orders already placed keep the version they were priced with.
    pub fn put_rate_table(&self, update: RateTableUpdate, now: Timestamp) -> StoreResult<RateTable> {
        let txn = self.db.begin_write()?;
        let table = {
            let mut rates = txn.open_table(RATE_TABLE)?;
            let current: Option<RateTable> = get_json(&rates, CURRENT_RATE_KEY)?;
            let version = current.map_or(0, |t| t.version) + 1;
            let table = update.into_table(version, now);
            table.validate().map_err(StoreError::InvalidRateTable)?;
            put_json(&mut rates, CURRENT_RATE_KEY, &table)?;
            table
        };
        txn.commit()?;
        Ok(table)
    }

    // ========== Coupons ==========

    pub fn coupon(&self, code: &str) -> StoreResult<Option<Coupon>> {
        let txn = self.db.begin_read()?;
        get_json(&txn.open_table(COUPONS_TABLE)?, code)
    }

    /// Create or replace a coupon; an existing usage count is kept
    pub fn put_coupon(&self, upsert: CouponUpsert) -> StoreResult<Coupon> {
        let code = Coupon::normalize_code(&upsert.code)?;
        let txn = self.db.begin_write()?;
        let coupon = {
            let mut coupons = txn.open_table(COUPONS_TABLE)?;
            let used_count = get_json::<Coupon, _>(&coupons, &code)?.map_or(0, |c| c.used_count);
            let coupon = Coupon::from_upsert(upsert, used_count)?;
            put_json(&mut coupons, &coupon.code, &coupon)?;
            coupon
        };
        txn.commit()?;
        Ok(coupon)
    }

    /// Count one redemption, only while the limit has room
    pub fn increment_coupon_if_below_limit(
        &self,
        txn: &WriteTransaction,
        code: &str,
    ) -> StoreResult<Coupon> {
        let mut coupons = txn.open_table(COUPONS_TABLE)?;
        let mut coupon: Coupon = get_json(&coupons, code)?
            .ok_or_else(|| StoreError::CouponNotFound(code.to_string()))?;
        if let Some(usage_limit) = coupon.usage_limit.filter(|_| !coupon.has_remaining_uses()) {
            return Err(StoreError::CouponLimitReached {
                code: coupon.code,
                usage_limit,
            });
        }
        coupon.used_count += 1;
        put_json(&mut coupons, code, &coupon)?;
        Ok(coupon)
    }

    // ========== Wallets ==========

    pub fn wallet(&self, user_id: &str) -> StoreResult<Wallet> {
        let txn = self.db.begin_read()?;
        Ok(get_json(&txn.open_table(WALLETS_TABLE)?, user_id)?
            .unwrap_or_else(|| Wallet::new(user_id)))
    }

    /// Top up a wallet in its own transaction
    pub fn credit_wallet(
        &self,
        user_id: &str,
        amount: f64,
        description: &str,
        now: Timestamp,
    ) -> StoreResult<Wallet> {
        let txn = self.db.begin_write()?;
        let wallet = self.credit_wallet_txn(&txn, user_id, amount, description, None, now)?;
        txn.commit()?;
        Ok(wallet)
    }

    pub fn credit_wallet_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
        amount: f64,
        description: &str,
        order_id: Option<&str>,
        now: Timestamp,
    ) -> StoreResult<Wallet> {
        let mut wallets = txn.open_table(WALLETS_TABLE)?;
        let mut wallet =
            get_json(&wallets, user_id)?.unwrap_or_else(|| Wallet::new(user_id));
        wallet.credit(amount, description, order_id.map(str::to_string), now)?;
        put_json(&mut wallets, user_id, &wallet)?;
        Ok(wallet)
    }

    /// Debit with a floor at zero: fails, leaving the wallet untouched, when
    /// the balance no longer covers `amount`
    pub fn debit_wallet_if_sufficient(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
        amount: f64,
        description: &str,
        order_id: &str,
        now: Timestamp,
    ) -> StoreResult<Wallet> {
        let mut wallets = txn.open_table(WALLETS_TABLE)?;
        let mut wallet =
            get_json(&wallets, user_id)?.unwrap_or_else(|| Wallet::new(user_id));
        wallet.debit(amount, description, Some(order_id.to_string()), now)?;
        put_json(&mut wallets, user_id, &wallet)?;
        Ok(wallet)
    }

    // ========== Orders ==========

    /// Next order id, `PRN{yyyymmdd}{10000 + n}`
    ///
    /// The counter moves with the caller's transaction, so an aborted order
    /// does not burn a number.
    pub fn next_order_id(&self, txn: &WriteTransaction, now: Timestamp) -> StoreResult<String> {
        let mut counters = txn.open_table(COUNTERS_TABLE)?;
        let current = counters
            .get(ORDER_SEQ_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0);
        let next = current + 1;
        counters.insert(ORDER_SEQ_KEY, next)?;
        Ok(format!("PRN{}{}", day_stamp(now), ORDER_NUMBER_BASE + next))
    }

    pub fn insert_order(&self, txn: &WriteTransaction, order: &Order) -> StoreResult<()> {
        {
            let mut orders = txn.open_table(ORDERS_TABLE)?;
            if orders.get(order.order_id.as_str())?.is_some() {
                return Err(StoreError::OrderExists(order.order_id.clone()));
            }
            put_json(&mut orders, &order.order_id, order)?;
        }
        let mut index = txn.open_multimap_table(USER_ORDERS_TABLE)?;
        index.insert(order.user_id.as_str(), order.order_id.as_str())?;
        Ok(())
    }

    /// Overwrite an existing order (edits re-price, they never create)
    pub fn replace_order(&self, txn: &WriteTransaction, order: &Order) -> StoreResult<()> {
        let mut orders = txn.open_table(ORDERS_TABLE)?;
        if orders.get(order.order_id.as_str())?.is_none() {
            return Err(StoreError::OrderNotFound(order.order_id.clone()));
        }
        put_json(&mut orders, &order.order_id, order)
    }

    pub fn order(&self, order_id: &str) -> StoreResult<Option<Order>> {
        let txn = self.db.begin_read()?;
        get_json(&txn.open_table(ORDERS_TABLE)?, order_id)
    }

    pub fn order_txn(&self, txn: &WriteTransaction, order_id: &str) -> StoreResult<Option<Order>> {
        get_json(&txn.open_table(ORDERS_TABLE)?, order_id)
    }

    /// A customer's orders, oldest first
    pub fn orders_for_user(&self, user_id: &str) -> StoreResult<Vec<Order>> {
        let txn = self.db.begin_read()?;
        let index = txn.open_multimap_table(USER_ORDERS_TABLE)?;
        let orders_table = txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for entry in index.get(user_id)? {
            let guard = entry?;
            if let Some(order) = get_json::<Order, _>(&orders_table, guard.value())? {
                orders.push(order);
            }
        }
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }
}
