//! # Table Commands
//!
//! Orders, discounts and bill splitting on a table.
//!
//! ## Table Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Table Lifecycle                                      │
//! │                                                                         │
//! │  ┌───────────┐  order_product  ┌───────────┐  process_payment  ┌──────┐│
//! │  │ Available │────────────────►│ Occupied  │──────────────────►│Waiting││
//! │  │           │  add_order_line │           │   (cashier.rs)    │Clean- ││
//! │  └───────────┘                 └───────────┘                   │ ing   ││
//! │        ▲                        │  apply_discount               └──┬───┘│
//! │        │                        │  split_bill                      │    │
//! │        │                        │  remove_order_line               │    │
//! │        │                                                           │    │
//! │        └───────────── set_table_status(available) ◄────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mesa_core::{Command, Event, Money, OrderLine, Table, TableStatus};
use serde::Serialize;
use tracing::debug;

use super::unexpected;
use crate::error::ApiError;
use crate::state::LedgerState;

/// A table with its derived amounts.
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    #[serde(flatten)]
    pub table: Table,
    pub subtotal: Money,
    /// Floor of `total / split_count`; `None` unless split.
    pub per_person_share: Option<Money>,
    /// Per-guest amounts that add up to the total.
    pub split_shares: Vec<Money>,
}

impl From<&Table> for TableView {
    fn from(table: &Table) -> Self {
        TableView {
            table: table.clone(),
            subtotal: table.subtotal(),
            per_person_share: table.per_person_share(),
            split_shares: table.split_shares(),
        }
    }
}

/// Lists the floor, optionally filtered by status.
pub fn list_tables(ledger: &LedgerState, status: Option<TableStatus>) -> Vec<TableView> {
    debug!(?status, "list_tables command");
    ledger.with_ledger(|l| {
        l.tables()
            .iter()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .map(TableView::from)
            .collect()
    })
}

pub fn get_table(ledger: &LedgerState, table_id: &str) -> Result<TableView, ApiError> {
    debug!(table_id, "get_table command");
    ledger
        .with_ledger(|l| l.table(table_id).map(TableView::from))
        .ok_or_else(|| ApiError::not_found("Table", table_id))
}

/// Appends a line built by the caller.
pub fn add_order_line(
    ledger: &LedgerState,
    table_id: String,
    line: OrderLine,
) -> Result<TableView, ApiError> {
    debug!(%table_id, product_id = %line.product_id, "add_order_line command");
    table_event(ledger.dispatch(Command::AddOrderLine { table_id, line })?)
}

/// Orders `quantity` of a menu product at its current price.
pub fn order_product(
    ledger: &LedgerState,
    table_id: String,
    product_id: String,
    quantity: i64,
) -> Result<TableView, ApiError> {
    debug!(%table_id, %product_id, quantity, "order_product command");
    table_event(ledger.dispatch(Command::OrderProduct {
        table_id,
        product_id,
        quantity,
    })?)
}

/// Removes every line of a product from the table.
pub fn remove_order_line(
    ledger: &LedgerState,
    table_id: String,
    product_id: String,
) -> Result<TableView, ApiError> {
    debug!(%table_id, %product_id, "remove_order_line command");
    table_event(ledger.dispatch(Command::RemoveOrderLine {
        table_id,
        product_id,
    })?)
}

pub fn apply_discount(
    ledger: &LedgerState,
    table_id: String,
    amount: Money,
    reason: Option<String>,
) -> Result<TableView, ApiError> {
    debug!(%table_id, %amount, "apply_discount command");
    table_event(ledger.dispatch(Command::ApplyDiscount {
        table_id,
        amount,
        reason,
    })?)
}

pub fn split_bill(ledger: &LedgerState, table_id: String, count: u32) -> Result<TableView, ApiError> {
    debug!(%table_id, count, "split_bill command");
    table_event(ledger.dispatch(Command::SplitBill { table_id, count })?)
}

pub fn set_table_status(
    ledger: &LedgerState,
    table_id: String,
    status: TableStatus,
) -> Result<TableView, ApiError> {
    debug!(%table_id, %status, "set_table_status command");
    table_event(ledger.dispatch(Command::SetTableStatus { table_id, status })?)
}

fn table_event(event: Event) -> Result<TableView, ApiError> {
    match event {
        Event::TableUpdated(table) => Ok(TableView::from(&table)),
        other => Err(unexpected(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::fresh_stamp;
    use chrono::Utc;
    use mesa_core::{Ledger, SeedConfig};

    fn state() -> LedgerState {
        LedgerState::new(Ledger::seeded(&SeedConfig::default(), &fresh_stamp()).unwrap())
    }

    #[test]
    fn test_pizza_table() {
        let state = state();
        order_product(&state, "table-1".into(), "2".into(), 2).unwrap();
        let view = apply_discount(
            &state,
            "table-1".into(),
            Money::from_major(5000),
            Some("birthday".into()),
        )
        .unwrap();
        assert_eq!(view.subtotal, Money::from_major(29136));
        assert_eq!(view.table.total(), Money::from_major(24136));

        let view = split_bill(&state, "table-1".into(), 3).unwrap();
        assert_eq!(view.per_person_share, Some(Money::from_cents(804533)));
        assert_eq!(view.split_shares.iter().copied().sum::<Money>(), view.table.total());
    }

    #[test]
    fn test_add_custom_line() {
        let state = state();
        let line = OrderLine::new("9", "Off-menu Soup", 2, Money::from_major(300), Utc::now());
        let view = add_order_line(&state, "table-4".into(), line).unwrap();
        assert_eq!(view.table.status, TableStatus::Occupied);
        assert_eq!(view.table.total(), Money::from_major(600));
    }

    #[test]
    fn test_remove_line_clamps_discount() {
        let state = state();
        order_product(&state, "table-2".into(), "4".into(), 1).unwrap();
        order_product(&state, "table-2".into(), "1".into(), 1).unwrap();
        apply_discount(&state, "table-2".into(), Money::from_major(3000), None).unwrap();

        let view = remove_order_line(&state, "table-2".into(), "1".into()).unwrap();
        assert_eq!(view.table.discount, Money::from_major(2350));
        assert!(view.table.total().is_zero());
    }

    #[test]
    fn test_filters_and_lookups() {
        let state = state();
        order_product(&state, "table-5".into(), "3".into(), 1).unwrap();

        let occupied = list_tables(&state, Some(TableStatus::Occupied));
        assert_eq!(occupied.len(), 1);
        assert_eq!(occupied[0].table.id, "table-5");
        assert_eq!(list_tables(&state, None).len(), 12);

        assert_eq!(get_table(&state, "table-40").unwrap_err().code, ErrorCode::NotFound);
    }

    #[test]
    fn test_rejections() {
        let state = state();
        let err = order_product(&state, "table-1".into(), "1".into(), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = split_bill(&state, "table-1".into(), 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = apply_discount(&state, "table-1".into(), Money::from_major(1), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let err = remove_order_line(&state, "table-1".into(), "1".into()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_set_status() {
        let state = state();
        let view =
            set_table_status(&state, "table-7".into(), TableStatus::WaitingCleaning).unwrap();
        assert_eq!(view.table.status, TableStatus::WaitingCleaning);
    }

    #[test]
    fn test_view_json_flattens_table() {
        let state = state();
        let view = get_table(&state, "table-1").unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], "table-1");
        assert_eq!(json["status"], "available");
        assert_eq!(json["subtotal"], 0);
        assert!(json["per_person_share"].is_null());
    }
}
