//! # Cashier Session Report
//!
//! The flat record a cashier downloads at the end of a shift.
//!
//! ## Format
//! ```text
//! {
//!   "date": "2026-10-15",
//!   "time": "22:30:00",
//!   "shift": "Morning",
//!   "total_sales": 2413600,      ◄── integer cents, no rounding on read-back
//!   "cash_sales": 0,
//!   "card_sales": 2413600,
//!   "check_sales": 0,
//!   "transaction_count": 1,
//!   "initial_cash": 10000,
//!   "final_cash": 10000,
//!   "difference": 0
//! }
//! ```

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::ledger::Ledger;
use crate::money::Money;
use crate::types::{CashierSession, SalesTotals};
use crate::validation::validate_final_cash;

/// Summary of one cashier session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionReport {
    #[ts(as = "String")]
    pub date: NaiveDate,
    #[ts(as = "String")]
    pub time: NaiveTime,
    pub shift: String,
    pub total_sales: Money,
    pub cash_sales: Money,
    pub card_sales: Money,
    pub check_sales: Money,
    pub transaction_count: u32,
    pub initial_cash: Money,
    pub final_cash: Money,
    /// `final_cash − (initial_cash + cash_sales)`.
    pub difference: Money,
}

impl SessionReport {
    /// Report for a closed session, dated at its end time and labelled with
    /// the shift recorded at close.
    ///
    /// Returns `None` while the session is still open.
    pub fn from_closed_session(session: &CashierSession) -> Option<Self> {
        let end_time = session.end_time?;
        let final_cash = session.final_cash?;
        let shift = session.shift.as_deref().unwrap_or_default();
        Some(Self::build(session, &session.sales, final_cash, shift, end_time))
    }

    /// Report for the open session as of `at`, using live sales and the cash
    /// counted so far.
    ///
    /// ## Errors
    /// - `NoOpenSession` when the cashier is closed
    /// - `Validation` when `counted_cash` is negative or implausibly large
    pub fn preview(ledger: &Ledger, counted_cash: Money, at: DateTime<Utc>) -> CoreResult<Self> {
        validate_final_cash(counted_cash)?;
        let session = ledger.current_session().ok_or(CoreError::NoOpenSession)?;
        let sales = ledger.session_totals().ok_or(CoreError::NoOpenSession)?;
        Ok(Self::build(session, &sales, counted_cash, ledger.shift(), at))
    }

    fn build(
        session: &CashierSession,
        sales: &SalesTotals,
        final_cash: Money,
        shift: &str,
        at: DateTime<Utc>,
    ) -> Self {
        SessionReport {
            date: at.date_naive(),
            time: whole_seconds(at.time()),
            shift: shift.to_string(),
            total_sales: sales.total,
            cash_sales: sales.cash,
            card_sales: sales.card,
            check_sales: sales.check,
            transaction_count: sales.transaction_count,
            initial_cash: session.initial_cash,
            final_cash,
            difference: final_cash - session.expected_cash(sales),
        }
    }

    /// Sales totals as recorded in the report.
    pub fn sales(&self) -> SalesTotals {
        SalesTotals {
            total: self.total_sales,
            cash: self.cash_sales,
            card: self.card_sales,
            check: self.check_sales,
            transaction_count: self.transaction_count,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Download name, e.g. `cashier-report-2026-10-15.json`.
    pub fn file_name(&self) -> String {
        format!("cashier-report-{}.json", self.date.format("%Y-%m-%d"))
    }
}

fn whole_seconds(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), time.second()).unwrap_or(time)
}
