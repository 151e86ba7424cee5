//! # Cashier Commands
//!
//! Payments and the cashier session lifecycle.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  open_cashier(float) ──► process_payment × n ──► close_cashier(count)   │
//! │        │                        │                       │               │
//! │        ▼                        ▼                       ▼               │
//! │  session opened          transaction tagged     expected = float +      │
//! │  (one at a time)         with session id        cash sales; a gap       │
//! │                                                 > 0.01 needs a reason   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mesa_core::{CashierSession, Command, Event, Money, PaymentMethod, SalesTotals, Transaction};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::unexpected;
use crate::error::ApiError;
use crate::state::LedgerState;

/// Snapshot of the cashier drawer.
#[derive(Debug, Clone, Serialize)]
pub struct CashierStatus {
    pub open: bool,
    pub shift: String,
    pub cashier_name: String,
    pub session: Option<CashierSession>,
    /// Live totals of the open session.
    pub sales: Option<SalesTotals>,
    /// Float plus cash sales of the open session.
    pub expected_cash: Option<Money>,
    pub average_ticket: Option<Money>,
}

/// Settles a table's bill.
pub fn process_payment(
    ledger: &LedgerState,
    table_id: String,
    method: PaymentMethod,
) -> Result<Transaction, ApiError> {
    debug!(%table_id, %method, "process_payment command");

    match ledger.dispatch(Command::ProcessPayment { table_id, method })? {
        Event::PaymentRecorded(transaction) => {
            info!(
                transaction_id = %transaction.id,
                table = transaction.table_number,
                total = %transaction.total,
                %method,
                "Payment recorded"
            );
            Ok(transaction)
        }
        other => Err(unexpected(other)),
    }
}

/// Transactions, newest last; only the open session's when `session_only`.
pub fn list_transactions(ledger: &LedgerState, session_only: bool) -> Vec<Transaction> {
    debug!(session_only, "list_transactions command");
    ledger.with_ledger(|l| {
        if !session_only {
            return l.transactions().to_vec();
        }
        match l.current_session() {
            Some(session) => l.session_transactions(&session.id).cloned().collect(),
            None => Vec::new(),
        }
    })
}

pub fn open_cashier(ledger: &LedgerState, initial_cash: Money) -> Result<CashierSession, ApiError> {
    debug!(%initial_cash, "open_cashier command");

    match ledger.dispatch(Command::OpenCashier { initial_cash })? {
        Event::CashierOpened(session) => {
            info!(session_id = %session.id, float = %session.initial_cash, "Cashier opened");
            Ok(session)
        }
        other => Err(unexpected(other)),
    }
}

/// Closes the open session against the counted drawer.
pub fn close_cashier(
    ledger: &LedgerState,
    final_cash: Money,
    reason: Option<String>,
) -> Result<CashierSession, ApiError> {
    debug!(%final_cash, "close_cashier command");

    match ledger.dispatch(Command::CloseCashier { final_cash, reason })? {
        Event::CashierClosed(session) => {
            if let Some(difference) = session.difference {
                warn!(
                    session_id = %session.id,
                    %difference,
                    reason = session.difference_reason.as_deref().unwrap_or(""),
                    "Cashier closed with a cash difference"
                );
            } else {
                info!(session_id = %session.id, "Cashier closed balanced");
            }
            Ok(session)
        }
        other => Err(unexpected(other)),
    }
}

pub fn cashier_status(ledger: &LedgerState) -> CashierStatus {
    debug!("cashier_status command");
    ledger.with_ledger(|l| {
        let sales = l.session_totals();
        CashierStatus {
            open: l.cashier_open(),
            shift: l.shift().to_string(),
            cashier_name: l.cashier_name().to_string(),
            session: l.current_session().cloned(),
            expected_cash: l.expected_cash(),
            average_ticket: sales.as_ref().map(SalesTotals::average_ticket),
            sales,
        }
    })
}

/// Closed sessions, oldest first.
pub fn session_history(ledger: &LedgerState) -> Vec<CashierSession> {
    debug!("session_history command");
    ledger.with_ledger(|l| l.closed_sessions().cloned().collect())
}

pub fn set_shift(ledger: &LedgerState, label: String) -> Result<String, ApiError> {
    debug!(%label, "set_shift command");

    match ledger.dispatch(Command::SetShift { label })? {
        Event::ShiftChanged(shift) => Ok(shift),
        other => Err(unexpected(other)),
    }
}
