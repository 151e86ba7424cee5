//! # State Module
//!
//! Shared state of the terminal.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐  ┌──────────────────────────────┐    │
//! │  │        LedgerState           │  │        ConfigState           │    │
//! │  │                              │  │                              │    │
//! │  │  Arc<Mutex<Ledger>>          │  │  shift, cashier_name         │    │
//! │  │  one writer at a time        │  │  table_count, initial_cash   │    │
//! │  │                              │  │  report_dir                  │    │
//! │  └──────────────────────────────┘  └──────────────────────────────┘    │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • LedgerState: snapshot replaced under the Mutex                      │
//! │  • ConfigState: read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod ledger;

pub use config::{parse_amount, ConfigState};
pub use ledger::{fresh_stamp, LedgerState};
