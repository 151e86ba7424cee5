//! # Order & Cashier Ledger
//!
//! The state machine behind the POS screens.
//!
//! ## Transition Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Ledger (snapshot N) ──┐                                              │
//! │                         ├──► Ledger::apply ──┬──► Ok(Transition)       │
//! │   Command + Stamp ──────┘                    │      ├── ledger (N+1)   │
//! │                                              │      └── event          │
//! │                                              │                          │
//! │                                              └──► Err(CoreError)       │
//! │                                                   (snapshot N kept)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `apply` never mutates `self`. It works on a copy and hands the copy back
//! only when every check passed, so callers see either the old snapshot or
//! the fully computed new one.
//!
//! ## State Machines
//! ```text
//! Cashier:  closed ──open──► open ──close (needs current session)──► closed
//!
//! Table:    available ──add order──► occupied ──pay──► waiting_cleaning
//!               ▲                                            │
//!               └────────────────set status──────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{
    CashierSession, OrderLine, PaymentMethod, Product, SalesTotals, Table, TableStatus,
    Transaction,
};
use crate::validation::{
    normalize_reason, validate_discount, validate_final_cash, validate_initial_cash,
    validate_order_line, validate_price, validate_quantity, validate_shift_label,
    validate_split_count,
};
use crate::RECONCILIATION_TOLERANCE_CENTS;

// =============================================================================
// Stamp
// =============================================================================

/// Inputs a transition needs from the outside world.
///
/// The ledger never reads the clock or generates identifiers itself, which
/// keeps `apply` deterministic. `id` is used only by transitions that create
/// an entity (payments and cashier openings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub at: DateTime<Utc>,
    pub id: String,
}

impl Stamp {
    pub fn new(at: DateTime<Utc>, id: impl Into<String>) -> Self {
        Stamp { at, id: id.into() }
    }
}

// =============================================================================
// Commands & Events
// =============================================================================

/// Every intent the view layer can send to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    UpdateProductPrice {
        product_id: String,
        new_price: Money,
    },
    SetProductAvailability {
        product_id: String,
        available: bool,
    },
    /// Appends a fully-formed line.
    AddOrderLine {
        table_id: String,
        line: OrderLine,
    },
    /// Builds the line from the catalog, freezing the current price.
    OrderProduct {
        table_id: String,
        product_id: String,
        quantity: i64,
    },
    /// Removes every line for the product.
    RemoveOrderLine {
        table_id: String,
        product_id: String,
    },
    /// Replaces any previous discount.
    ApplyDiscount {
        table_id: String,
        amount: Money,
        reason: Option<String>,
    },
    SplitBill {
        table_id: String,
        count: u32,
    },
    ProcessPayment {
        table_id: String,
        method: PaymentMethod,
    },
    SetTableStatus {
        table_id: String,
        status: TableStatus,
    },
    OpenCashier {
        initial_cash: Money,
    },
    CloseCashier {
        final_cash: Money,
        reason: Option<String>,
    },
    SetShift {
        label: String,
    },
}

/// What a successful transition did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    ProductUpdated(Product),
    TableUpdated(Table),
    PaymentRecorded(Transaction),
    CashierOpened(CashierSession),
    CashierClosed(CashierSession),
    ShiftChanged(String),
}

/// The result of a successful `apply`.
#[derive(Debug, Clone)]
pub struct Transition {
    pub ledger: Ledger,
    pub event: Event,
}

// =============================================================================
// Ledger
// =============================================================================

/// The complete POS state: catalog, tables, transaction log and sessions.
///
/// ## Invariants
/// - `tables` has fixed cardinality after construction
/// - `transactions` and `sessions` are append-only
/// - `cashier_open == current_session.is_some()`
/// - at most one session has no end time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ledger {
    products: Vec<Product>,
    tables: Vec<Table>,
    transactions: Vec<Transaction>,
    sessions: Vec<CashierSession>,
    current_session: Option<String>,
    cashier_open: bool,
    shift: String,
    cashier_name: String,
}

impl Ledger {
    /// Creates a ledger with the given catalog, `table_count` empty tables
    /// numbered from 1, and the cashier closed.
    pub fn new(
        products: Vec<Product>,
        table_count: u32,
        shift: impl Into<String>,
        cashier_name: impl Into<String>,
    ) -> Self {
        Ledger {
            products,
            tables: (1..=table_count).map(Table::new).collect(),
            transactions: Vec::new(),
            sessions: Vec::new(),
            current_session: None,
            cashier_open: false,
            shift: shift.into(),
            cashier_name: cashier_name.into(),
        }
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Computes the next snapshot for `command`.
    ///
    /// On error `self` is untouched and nothing was recorded.
    pub fn apply(&self, command: Command, stamp: &Stamp) -> CoreResult<Transition> {
        let mut next = self.clone();

        let event = match command {
            Command::UpdateProductPrice {
                product_id,
                new_price,
            } => {
                validate_price(new_price)?;
                let product = next.product_mut(&product_id)?;
                product.price = new_price;
                Event::ProductUpdated(product.clone())
            }

            Command::SetProductAvailability {
                product_id,
                available,
            } => {
                let product = next.product_mut(&product_id)?;
                product.available = available;
                Event::ProductUpdated(product.clone())
            }

            Command::AddOrderLine { table_id, line } => {
                validate_order_line(&line)?;
                next.add_line(&table_id, line)?
            }

            Command::OrderProduct {
                table_id,
                product_id,
                quantity,
            } => {
                validate_quantity(quantity)?;
                // Resolve the table first so an unknown table wins over an unknown product.
                next.table(&table_id)
                    .ok_or_else(|| CoreError::TableNotFound(table_id.clone()))?;
                let product = next
                    .product(&product_id)
                    .ok_or_else(|| CoreError::ProductNotFound(product_id.clone()))?;
                if !product.available {
                    return Err(CoreError::ProductUnavailable(product_id));
                }
                let line = OrderLine::from_product(product, quantity, stamp.at);
                next.add_line(&table_id, line)?
            }

            Command::RemoveOrderLine {
                table_id,
                product_id,
            } => {
                let table = next.table_mut(&table_id)?;
                let before = table.orders.len();
                table.orders.retain(|line| line.product_id != product_id);
                if table.orders.len() == before {
                    return Err(CoreError::OrderLineNotFound {
                        table_id,
                        product_id,
                    });
                }
                table.recompute_total();
                Event::TableUpdated(table.clone())
            }

            Command::ApplyDiscount {
                table_id,
                amount,
                reason,
            } => {
                validate_discount(amount)?;
                let reason = normalize_reason(reason.as_deref())?;
                let table = next.table_mut(&table_id)?;
                let subtotal = table.subtotal();
                if amount > subtotal {
                    return Err(CoreError::DiscountExceedsSubtotal {
                        discount: amount,
                        subtotal,
                    });
                }
                table.discount = amount;
                table.discount_reason = reason;
                table.recompute_total();
                Event::TableUpdated(table.clone())
            }

            Command::SplitBill { table_id, count } => {
                validate_split_count(count)?;
                let table = next.table_mut(&table_id)?;
                table.split_count = Some(count);
                Event::TableUpdated(table.clone())
            }

            Command::ProcessPayment { table_id, method } => {
                next.settle(&table_id, method, stamp)?
            }

            Command::SetTableStatus { table_id, status } => {
                let table = next.table_mut(&table_id)?;
                table.status = status;
                Event::TableUpdated(table.clone())
            }

            Command::OpenCashier { initial_cash } => {
                if let Some(open) = &next.current_session {
                    return Err(CoreError::SessionAlreadyOpen(open.clone()));
                }
                validate_initial_cash(initial_cash)?;

                let session = CashierSession::open(stamp.id.clone(), stamp.at, initial_cash);
                next.sessions.push(session.clone());
                next.current_session = Some(session.id.clone());
                next.cashier_open = true;
                Event::CashierOpened(session)
            }

            Command::CloseCashier { final_cash, reason } => {
                next.close_session(final_cash, reason.as_deref(), stamp)?
            }

            Command::SetShift { label } => {
                next.shift = validate_shift_label(&label)?;
                Event::ShiftChanged(next.shift.clone())
            }
        };

        Ok(Transition { ledger: next, event })
    }

    fn add_line(&mut self, table_id: &str, line: OrderLine) -> CoreResult<Event> {
        let table = self.table_mut(table_id)?;
        // Every later subtotal is a subset of this sum, so it cannot overflow either.
        Money::checked_sum(table.orders.iter().map(|l| l.total).chain([line.total]))
            .ok_or_else(|| CoreError::AmountOverflow("table subtotal".to_string()))?;
        table.orders.push(line);
        table.status = TableStatus::Occupied;
        table.recompute_total();
        Ok(Event::TableUpdated(table.clone()))
    }

    fn settle(&mut self, table_id: &str, method: PaymentMethod, stamp: &Stamp) -> CoreResult<Event> {
        let cashier_name = self.cashier_name.clone();
        let session_id = self.current_session.clone();

        let table = self.table_mut(table_id)?;
        if table.status != TableStatus::Occupied || table.orders.is_empty() {
            return Err(CoreError::NothingToSettle {
                table_id: table_id.to_string(),
                status: table.status.to_string(),
            });
        }
        let session_id = session_id.ok_or(CoreError::NoOpenSession)?;

        let transaction = Transaction {
            id: stamp.id.clone(),
            table_id: table.id.clone(),
            table_number: table.number,
            items: table.orders.clone(),
            subtotal: table.subtotal(),
            discount: table.discount,
            total: table.total(),
            payment_method: method,
            timestamp: stamp.at,
            cashier_name,
            session_id,
        };
        table.reset_after_settlement();

        self.check_session_capacity(&transaction)?;
        self.transactions.push(transaction.clone());
        Ok(Event::PaymentRecorded(transaction))
    }

    /// Rejects a payment whose session totals or expected drawer would
    /// overflow.
    fn check_session_capacity(&self, transaction: &Transaction) -> CoreResult<()> {
        let session = self
            .sessions
            .iter()
            .find(|s| s.id == transaction.session_id)
            .ok_or(CoreError::NoOpenSession)?;

        let sales = SalesTotals::from_transactions(self.session_transactions(&session.id))
            .checked_record(transaction)
            .ok_or_else(|| CoreError::AmountOverflow("session sales".to_string()))?;
        session
            .initial_cash
            .checked_add(sales.cash)
            .ok_or_else(|| CoreError::AmountOverflow("expected cash".to_string()))?;

        Ok(())
    }

    fn close_session(
        &mut self,
        final_cash: Money,
        reason: Option<&str>,
        stamp: &Stamp,
    ) -> CoreResult<Event> {
        let session_id = self
            .current_session
            .clone()
            .ok_or(CoreError::NoOpenSession)?;
        validate_final_cash(final_cash)?;
        let reason = normalize_reason(reason)?;

        let sales = SalesTotals::from_transactions(self.session_transactions(&session_id));
        let shift = self.shift.clone();
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or(CoreError::NoOpenSession)?;

        let difference = final_cash
            .checked_sub(session.expected_cash(&sales))
            .ok_or_else(|| CoreError::AmountOverflow("cash difference".to_string()))?;
        let outside_tolerance = difference.abs().cents() > RECONCILIATION_TOLERANCE_CENTS;
        if outside_tolerance && reason.is_none() {
            return Err(CoreError::JustificationRequired { difference });
        }

        session.end_time = Some(stamp.at);
        session.final_cash = Some(final_cash);
        session.sales = sales;
        session.difference = outside_tolerance.then_some(difference);
        session.difference_reason = reason;
        session.shift = Some(shift);
        let closed = session.clone();

        self.current_session = None;
        self.cashier_open = false;
        Ok(Event::CashierClosed(closed))
    }

    fn product_mut(&mut self, product_id: &str) -> CoreResult<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))
    }

    fn table_mut(&mut self, table_id: &str) -> CoreResult<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.id == table_id)
            .ok_or_else(|| CoreError::TableNotFound(table_id.to_string()))
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, table_id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == table_id)
    }

    pub fn tables_with_status(&self, status: TableStatus) -> impl Iterator<Item = &Table> {
        self.tables.iter().filter(move |t| t.status == status)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Transactions recorded while `session_id` was open.
    pub fn session_transactions<'a>(
        &'a self,
        session_id: &'a str,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions
            .iter()
            .filter(move |t| t.session_id == session_id)
    }

    /// Full session history, oldest first.
    pub fn sessions(&self) -> &[CashierSession] {
        &self.sessions
    }

    pub fn closed_sessions(&self) -> impl Iterator<Item = &CashierSession> {
        self.sessions.iter().filter(|s| !s.is_open())
    }

    pub fn current_session(&self) -> Option<&CashierSession> {
        let id = self.current_session.as_deref()?;
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Live sales of the open session.
    pub fn session_totals(&self) -> Option<SalesTotals> {
        let session = self.current_session()?;
        Some(SalesTotals::from_transactions(
            self.session_transactions(&session.id),
        ))
    }

    /// Cash the drawer should hold right now.
    pub fn expected_cash(&self) -> Option<Money> {
        let session = self.current_session()?;
        let totals = self.session_totals()?;
        Some(session.expected_cash(&totals))
    }

    pub fn cashier_open(&self) -> bool {
        self.cashier_open
    }

    pub fn shift(&self) -> &str {
        &self.shift
    }

    pub fn cashier_name(&self) -> &str {
        &self.cashier_name
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
