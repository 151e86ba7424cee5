//! # Domain Types
//!
//! Core domain types used throughout Mesa POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Table       │   │  Transaction    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id / number    │   │  id             │       │
//! │  │  name           │──►│  status         │──►│  items (frozen) │       │
//! │  │  price          │   │  orders         │   │  subtotal       │       │
//! │  │  available      │   │  discount       │   │  discount/total │       │
//! │  └─────────────────┘   │  split_count    │   │  payment_method │       │
//! │                        └─────────────────┘   └────────┬────────┘       │
//! │                                                       │                 │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │  TableStatus    │   │ PaymentMethod   │   │ CashierSession  │       │
//! │  │  Available      │   │  Cash           │   │  initial_cash   │       │
//! │  │  Occupied       │   │  Card           │   │  sales totals   │       │
//! │  │  WaitingCleaning│   │  Check          │   │  difference     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! An `OrderLine` copies the product name and price when it is created.
//! Later price changes never reach lines already on a table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    /// Current menu price.
    pub price: Money,
    /// Whether the kitchen can take orders for it.
    pub available: bool,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: Money,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            description: None,
            price,
            available: true,
        }
    }
}

// =============================================================================
// Order Line
// =============================================================================

/// One product/quantity entry on a table's open bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    pub product_id: String,
    /// Product name at time of ordering (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// Unit price at time of ordering (frozen).
    pub unit_price: Money,
    /// `quantity × unit_price`.
    pub total: Money,
    #[ts(as = "String")]
    pub ordered_at: DateTime<Utc>,
}

impl OrderLine {
    /// Creates a line and computes its total.
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        quantity: i64,
        unit_price: Money,
        ordered_at: DateTime<Utc>,
    ) -> Self {
        OrderLine {
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity,
            unit_price,
            total: unit_price.multiply_quantity(quantity),
            ordered_at,
        }
    }

    /// Creates a line from the catalog, freezing the current price.
    pub fn from_product(product: &Product, quantity: i64, ordered_at: DateTime<Utc>) -> Self {
        OrderLine::new(
            product.id.clone(),
            product.name.clone(),
            quantity,
            product.price,
            ordered_at,
        )
    }
}

// =============================================================================
// Table Status
// =============================================================================

/// Where a table is in its order-to-payment lifecycle.
///
/// ```text
/// Available ──(first order)──► Occupied ──(payment)──► WaitingCleaning
///     ▲                                                      │
///     └──────────────────(set status: available)─────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    WaitingCleaning,
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableStatus::Available => write!(f, "available"),
            TableStatus::Occupied => write!(f, "occupied"),
            TableStatus::WaitingCleaning => write!(f, "waiting_cleaning"),
        }
    }
}

impl FromStr for TableStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(TableStatus::Available),
            "occupied" => Ok(TableStatus::Occupied),
            "waiting_cleaning" | "cleaning" => Ok(TableStatus::WaitingCleaning),
            other => Err(ValidationError::InvalidFormat {
                field: "table status".to_string(),
                reason: format!(
                    "unknown status '{}', expected available, occupied or waiting_cleaning",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Table
// =============================================================================

/// A physical seating unit and its open bill.
///
/// ## Invariants
/// - `total == Σ orders.total − discount`; the field is private and only
///   recomputed by the ledger
/// - `discount <= Σ orders.total`, so `total` is never negative
/// - `split_count`, when present, is at least 2
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct Table {
    pub id: String,
    pub number: u32,
    pub status: TableStatus,
    pub orders: Vec<OrderLine>,
    total: Money,
    pub discount: Money,
    pub discount_reason: Option<String>,
    /// Number of guests the bill is split between.
    pub split_count: Option<u32>,
}

impl Table {
    /// Creates an empty, available table labelled `number`.
    pub fn new(number: u32) -> Self {
        Table {
            id: Table::id_for(number),
            number,
            status: TableStatus::Available,
            orders: Vec::new(),
            total: Money::zero(),
            discount: Money::zero(),
            discount_reason: None,
            split_count: None,
        }
    }

    /// Identifier used for table `number`, e.g. `table-7`.
    pub fn id_for(number: u32) -> String {
        format!("table-{}", number)
    }

    /// Sum of line totals before discount.
    pub fn subtotal(&self) -> Money {
        self.orders.iter().map(|line| line.total).sum()
    }

    /// Amount due: subtotal minus discount.
    #[inline]
    pub fn total(&self) -> Money {
        self.total
    }

    pub fn is_split(&self) -> bool {
        self.split_count.is_some()
    }

    /// What each guest pays when the bill is split, rounded down to the cent.
    ///
    /// `None` unless the bill is split. Use [`Table::split_shares`] when the
    /// amounts must add back up to the total.
    pub fn per_person_share(&self) -> Option<Money> {
        self.split_count
            .filter(|count| *count > 0)
            .map(|count| Money::from_cents(self.total.cents().div_euclid(i64::from(count))))
    }

    /// Exact per-guest amounts that add back up to the total.
    ///
    /// Empty when the bill is not split.
    pub fn split_shares(&self) -> Vec<Money> {
        match self.split_count {
            Some(count) => self.total.split_even(count),
            None => Vec::new(),
        }
    }

    /// Restores `total == subtotal − discount`, clamping the discount to the
    /// subtotal first.
    pub(crate) fn recompute_total(&mut self) {
        let subtotal = self.subtotal();
        if self.discount > subtotal {
            self.discount = subtotal;
        }
        self.total = subtotal - self.discount;
    }

    /// Clears the bill after settlement.
    pub(crate) fn reset_after_settlement(&mut self) {
        self.status = TableStatus::WaitingCleaning;
        self.orders.clear();
        self.discount = Money::zero();
        self.discount_reason = None;
        self.split_count = None;
        self.total = Money::zero();
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Check,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] =
        [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Check];
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Check => write!(f, "check"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" | "credit" | "debit" => Ok(PaymentMethod::Card),
            "check" | "cheque" => Ok(PaymentMethod::Check),
            other => Err(ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: format!("unknown method '{}', expected cash, card or check", other),
            }),
        }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A settled bill. Created once by `ProcessPayment`, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub table_id: String,
    pub table_number: u32,
    /// Order lines at time of payment (frozen).
    pub items: Vec<OrderLine>,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub payment_method: PaymentMethod,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub cashier_name: String,
    /// Session that was open when the payment was taken.
    pub session_id: String,
}

// =============================================================================
// Sales Totals
// =============================================================================

/// Sales aggregated over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesTotals {
    pub total: Money,
    pub cash: Money,
    pub card: Money,
    pub check: Money,
    pub transaction_count: u32,
}

impl SalesTotals {
    /// Aggregates the given transactions.
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut totals = SalesTotals::default();
        for transaction in transactions {
            totals.record(transaction);
        }
        totals
    }

    /// Adds one transaction to the totals.
    pub fn record(&mut self, transaction: &Transaction) {
        self.total += transaction.total;
        self.transaction_count += 1;
        match transaction.payment_method {
            PaymentMethod::Cash => self.cash += transaction.total,
            PaymentMethod::Card => self.card += transaction.total,
            PaymentMethod::Check => self.check += transaction.total,
        }
    }

    /// Totals with one more transaction, or `None` if any amount overflows.
    pub fn checked_record(&self, transaction: &Transaction) -> Option<SalesTotals> {
        let mut next = *self;
        next.total = next.total.checked_add(transaction.total)?;
        next.transaction_count = next.transaction_count.checked_add(1)?;
        let bucket = match transaction.payment_method {
            PaymentMethod::Cash => &mut next.cash,
            PaymentMethod::Card => &mut next.card,
            PaymentMethod::Check => &mut next.check,
        };
        *bucket = bucket.checked_add(transaction.total)?;
        Some(next)
    }

    /// Sales for one payment method.
    pub fn by_method(&self, method: PaymentMethod) -> Money {
        match method {
            PaymentMethod::Cash => self.cash,
            PaymentMethod::Card => self.card,
            PaymentMethod::Check => self.check,
        }
    }

    /// Mean transaction total, rounded down. Zero with no transactions.
    pub fn average_ticket(&self) -> Money {
        if self.transaction_count == 0 {
            return Money::zero();
        }
        Money::from_cents(
            self.total
                .cents()
                .div_euclid(i64::from(self.transaction_count)),
        )
    }
}

// =============================================================================
// Cashier Session
// =============================================================================

/// A bounded interval of cashier operation, reconciled at close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashierSession {
    pub id: String,
    #[ts(as = "String")]
    pub start_time: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub end_time: Option<DateTime<Utc>>,
    pub initial_cash: Money,
    pub final_cash: Option<Money>,
    /// Zero while open; filled in at close.
    pub sales: SalesTotals,
    /// `final_cash − expected cash`, recorded only when it exceeds the tolerance.
    pub difference: Option<Money>,
    pub difference_reason: Option<String>,
    /// Shift label in effect when the session closed.
    #[serde(default)]
    pub shift: Option<String>,
}

impl CashierSession {
    /// Opens a session with zeroed totals.
    pub fn open(id: impl Into<String>, start_time: DateTime<Utc>, initial_cash: Money) -> Self {
        CashierSession {
            id: id.into(),
            start_time,
            end_time: None,
            initial_cash,
            final_cash: None,
            sales: SalesTotals::default(),
            difference: None,
            difference_reason: None,
            shift: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Cash that should be in the drawer for the given sales.
    pub fn expected_cash(&self, sales: &SalesTotals) -> Money {
        self.initial_cash + sales.cash
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
