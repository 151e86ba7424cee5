//! # mesa-core: Pure Business Logic for Mesa POS
//!
//! The order and cashier ledger of a restaurant POS terminal, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mesa POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      View layer                                 │   │
//! │  │    Tables ──► Orders ──► Discount/Split ──► Payment ──► Cashier │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON lines                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    mesa-terminal                                │   │
//! │  │    LedgerState (Mutex) ──► commands ──► ApiError                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mesa-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  ledger   │  │  report   │  │   │
//! │  │   │  Table    │  │   Money   │  │  Command  │  │  Session  │  │   │
//! │  │   │  Session  │  │  splits   │  │  apply()  │  │  Report   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Table, Transaction, CashierSession)
//! - [`money`] - Money type with integer arithmetic
//! - [`ledger`] - Commands and the `Ledger::apply` state transition
//! - [`report`] - Cashier session report
//! - [`seed`] - Starting menu, tables and session
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use mesa_core::{Command, Ledger, Money, PaymentMethod, SeedConfig, Stamp};
//!
//! let ledger = Ledger::seeded(&SeedConfig::default(), &Stamp::new(Utc::now(), "session-1"))?;
//!
//! let ledger = ledger
//!     .apply(
//!         Command::OrderProduct {
//!             table_id: "table-1".into(),
//!             product_id: "2".into(),
//!             quantity: 2,
//!         },
//!         &Stamp::new(Utc::now(), "unused"),
//!     )?
//!     .ledger;
//! assert_eq!(ledger.table("table-1").unwrap().total(), Money::from_major(29136));
//!
//! let paid = ledger.apply(
//!     Command::ProcessPayment {
//!         table_id: "table-1".into(),
//!         method: PaymentMethod::Card,
//!     },
//!     &Stamp::new(Utc::now(), "txn-1"),
//! )?;
//! assert_eq!(paid.ledger.transactions().len(), 1);
//! # Ok::<(), mesa_core::CoreError>(())
//! ```

pub mod error;
pub mod ledger;
pub mod money;
pub mod report;
pub mod seed;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{Command, Event, Ledger, Stamp, Transition};
pub use money::Money;
pub use report::SessionReport;
pub use seed::SeedConfig;
pub use types::*;

/// Maximum quantity of a single order line.
///
/// Guards against typing 1000 instead of 10.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price accepted, in cents (100,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 10_000_000_000;

/// Highest float or counted drawer accepted, in cents (10,000,000,000.00).
pub const MAX_CASH_CENTS: i64 = 1_000_000_000_000;

pub const MIN_SPLIT_COUNT: u32 = 2;

/// Upper bound on guests sharing one bill.
pub const MAX_SPLIT_COUNT: u32 = 50;

/// Maximum length of discount reasons and cash justifications.
pub const MAX_TEXT_LEN: usize = 500;

/// Cash differences up to this many cents close without a justification.
pub const RECONCILIATION_TOLERANCE_CENTS: i64 = 1;
