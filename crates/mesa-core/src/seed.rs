//! # Seed Data
//!
//! The state a terminal starts from: a six-item menu, a fixed pool of
//! tables and one cashier session already open.
//!
//! ## Menu
//! | id | name              | category | price    |
//! |----|-------------------|----------|----------|
//! | 1  | Classic Burger    | Mains    | 12207.00 |
//! | 2  | Margherita Pizza  | Mains    | 14568.00 |
//! | 3  | Caesar Salad      | Salads   |  9388.00 |
//! | 4  | Coca Cola         | Drinks   |  2350.00 |
//! | 5  | Craft Beer        | Drinks   |  4690.00 |
//! | 6  | Tiramisu          | Desserts |  6568.00 |

use crate::error::CoreResult;
use crate::ledger::{Command, Ledger, Stamp};
use crate::money::Money;
use crate::types::Product;

/// Default number of tables on the floor.
pub const DEFAULT_TABLE_COUNT: u32 = 12;

/// Default float of the pre-opened session (100.00).
pub const DEFAULT_INITIAL_CASH: Money = Money::from_major(100);

pub const DEFAULT_SHIFT: &str = "Morning";

/// Name stamped on every transaction.
pub const DEFAULT_CASHIER_NAME: &str = "Head Cashier";

const MENU: &[(&str, &str, &str, i64)] = &[
    ("1", "Classic Burger", "Mains", 12207),
    ("2", "Margherita Pizza", "Mains", 14568),
    ("3", "Caesar Salad", "Salads", 9388),
    ("4", "Coca Cola", "Drinks", 2350),
    ("5", "Craft Beer", "Drinks", 4690),
    ("6", "Tiramisu", "Desserts", 6568),
];

/// Knobs for the starting state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub table_count: u32,
    pub initial_cash: Money,
    pub shift: String,
    pub cashier_name: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig {
            table_count: DEFAULT_TABLE_COUNT,
            initial_cash: DEFAULT_INITIAL_CASH,
            shift: DEFAULT_SHIFT.to_string(),
            cashier_name: DEFAULT_CASHIER_NAME.to_string(),
        }
    }
}

/// The fixed six-product menu.
pub fn default_menu() -> Vec<Product> {
    MENU.iter()
        .map(|(id, name, category, price)| {
            Product::new(*id, *name, *category, Money::from_major(*price))
        })
        .collect()
}

impl Ledger {
    /// Builds the starting ledger.
    ///
    /// The initial session is opened through `apply`, so the seed obeys the
    /// same validation as any later opening. `stamp` supplies its id and
    /// start time.
    pub fn seeded(config: &SeedConfig, stamp: &Stamp) -> CoreResult<Ledger> {
        let ledger = Ledger::new(
            default_menu(),
            config.table_count,
            config.shift.clone(),
            config.cashier_name.clone(),
        );

        let opened = ledger.apply(
            Command::OpenCashier {
                initial_cash: config.initial_cash,
            },
            stamp,
        )?;

        Ok(opened.ledger)
    }
}
