//! # Commands Module
//!
//! One function per terminal operation.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── catalog.rs  ◄─── Menu listing, price and availability
//! ├── table.rs    ◄─── Orders, discounts, splits, table status
//! ├── cashier.rs  ◄─── Payments, session open/close, shift
//! └── report.rs   ◄─── Session report preview and export
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  {"command":"order_product","table_id":"table-1",...}                   │
//! │         │                                                               │
//! │         │ (protocol::dispatch)                                          │
//! │         ▼                                                               │
//! │  fn order_product(                                                      │
//! │      ledger: &LedgerState,    ◄── Only the state it needs               │
//! │      table_id: String,                                                  │
//! │      product_id: String,                                                │
//! │      quantity: i64,                                                     │
//! │  ) -> Result<TableView, ApiError>                                       │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  {"ok":true,"data":{...}}                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cashier;
pub mod catalog;
pub mod report;
pub mod table;

use mesa_core::Event;

use crate::error::ApiError;

/// A transition produced an event other than the one its command emits.
pub(crate) fn unexpected(event: Event) -> ApiError {
    tracing::error!(?event, "Unexpected ledger event");
    ApiError::internal("Unexpected ledger event")
}
