//! # Configuration State
//!
//! Stores terminal configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`MESA_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use directories::ProjectDirs;
use mesa_core::seed::{DEFAULT_CASHIER_NAME, DEFAULT_INITIAL_CASH, DEFAULT_SHIFT, DEFAULT_TABLE_COUNT};
use mesa_core::validation::validate_initial_cash;
use mesa_core::{Money, SeedConfig};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

/// Terminal configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (shown in the startup banner)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Shift label of the session opened at startup
    pub shift: String,

    /// Name stamped on every transaction
    pub cashier_name: String,

    /// Number of tables on the floor
    pub table_count: u32,

    /// Float of the session opened at startup
    pub initial_cash: Money,

    /// Where exported session reports are written
    pub report_dir: PathBuf,
}

impl Default for ConfigState {
    /// ## Default Values
    /// - Store: "Mesa POS"
    /// - Currency: $
    /// - 12 tables, 100.00 float, "Morning" shift
    /// - Reports: platform data directory, `reports/` subfolder
    fn default() -> Self {
        ConfigState {
            store_name: "Mesa POS".to_string(),
            currency_symbol: "$".to_string(),
            shift: DEFAULT_SHIFT.to_string(),
            cashier_name: DEFAULT_CASHIER_NAME.to_string(),
            table_count: DEFAULT_TABLE_COUNT,
            initial_cash: DEFAULT_INITIAL_CASH,
            report_dir: default_report_dir(),
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `MESA_STORE_NAME`: Override store name
    /// - `MESA_CURRENCY_SYMBOL`: Override currency symbol
    /// - `MESA_SHIFT`: Shift label of the startup session
    /// - `MESA_CASHIER_NAME`: Cashier stamped on transactions
    /// - `MESA_TABLE_COUNT`: Number of tables (e.g., "20")
    /// - `MESA_INITIAL_CASH`: Startup float (e.g., "150.00")
    /// - `MESA_REPORT_DIR`: Report export directory
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ConfigState::from_env`] with an arbitrary variable source.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(store_name) = lookup("MESA_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = lookup("MESA_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(shift) = lookup("MESA_SHIFT").filter(|s| !s.trim().is_empty()) {
            config.shift = shift.trim().to_string();
        }

        if let Some(name) = lookup("MESA_CASHIER_NAME").filter(|s| !s.trim().is_empty()) {
            config.cashier_name = name.trim().to_string();
        }

        if let Some(raw) = lookup("MESA_TABLE_COUNT") {
            match raw.trim().parse::<u32>() {
                Ok(count) if count > 0 => config.table_count = count,
                _ => warn!(value = %raw, "Ignoring invalid MESA_TABLE_COUNT"),
            }
        }

        if let Some(raw) = lookup("MESA_INITIAL_CASH") {
            match parse_amount(&raw) {
                Some(amount) if validate_initial_cash(amount).is_ok() => {
                    config.initial_cash = amount
                }
                _ => warn!(value = %raw, "Ignoring invalid MESA_INITIAL_CASH"),
            }
        }

        if let Some(dir) = lookup("MESA_REPORT_DIR") {
            config.report_dir = PathBuf::from(dir);
        }

        config
    }

    /// Starting state for the ledger.
    pub fn seed_config(&self) -> SeedConfig {
        SeedConfig {
            table_count: self.table_count,
            initial_cash: self.initial_cash,
            shift: self.shift.clone(),
            cashier_name: self.cashier_name.clone(),
        }
    }

    /// Formats an amount with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(804533)), "$8045.33");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{}{}.{:02}",
            if amount.is_negative() { "-" } else { "" },
            self.currency_symbol,
            amount.major().abs(),
            amount.minor().abs()
        )
    }
}

/// Parses a decimal amount such as `"100"`, `"99.5"` or `"12.34"` into cents.
///
/// More than two decimals, negative amounts and anything that is not a
/// decimal yield `None`.
pub fn parse_amount(raw: &str) -> Option<Money> {
    let amount = raw.trim().parse::<Decimal>().ok()?;
    if amount.is_sign_negative() || amount.scale() > 2 {
        return None;
    }

    amount
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()
        .map(Money::from_cents)
}

/// Platform-specific report folder.
///
/// - **macOS**: `~/Library/Application Support/com.mesa.pos/reports`
/// - **Windows**: `%APPDATA%\mesa\pos\data\reports`
/// - **Linux**: `~/.local/share/pos/reports`
fn default_report_dir() -> PathBuf {
    ProjectDirs::from("com", "mesa", "pos")
        .map(|dirs| dirs.data_dir().join("reports"))
        .unwrap_or_else(|| PathBuf::from("reports"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::from_lookup(|_| None);
        assert_eq!(config.table_count, 12);
        assert_eq!(config.initial_cash, Money::from_major(100));
        assert_eq!(config.shift, "Morning");
        assert_eq!(config.seed_config(), SeedConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ConfigState::from_lookup(lookup_from(&[
            ("MESA_STORE_NAME", "Chez Mesa"),
            ("MESA_SHIFT", " Evening "),
            ("MESA_CASHIER_NAME", "Dana"),
            ("MESA_TABLE_COUNT", "20"),
            ("MESA_INITIAL_CASH", "150.50"),
            ("MESA_REPORT_DIR", "/tmp/mesa-reports"),
        ]));

        assert_eq!(config.store_name, "Chez Mesa");
        assert_eq!(config.shift, "Evening");
        assert_eq!(config.cashier_name, "Dana");
        assert_eq!(config.table_count, 20);
        assert_eq!(config.initial_cash, Money::from_cents(15050));
        assert_eq!(config.report_dir, PathBuf::from("/tmp/mesa-reports"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ConfigState::from_lookup(lookup_from(&[
            ("MESA_TABLE_COUNT", "0"),
            ("MESA_INITIAL_CASH", "-5"),
            ("MESA_SHIFT", "   "),
        ]));

        assert_eq!(config.table_count, 12);
        assert_eq!(config.initial_cash, Money::from_major(100));
        assert_eq!(config.shift, "Morning");

        let config = ConfigState::from_lookup(lookup_from(&[(
            "MESA_INITIAL_CASH",
            "50000000000000000",
        )]));
        assert_eq!(config.initial_cash, Money::from_major(100));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100"), Some(Money::from_major(100)));
        assert_eq!(parse_amount("99.5"), Some(Money::from_cents(9950)));
        assert_eq!(parse_amount(" 12.34 "), Some(Money::from_cents(1234)));
        assert_eq!(parse_amount("0.07"), Some(Money::from_cents(7)));
        assert_eq!(parse_amount("1.234"), None);
        assert_eq!(parse_amount("-1"), None);
        assert_eq!(parse_amount("-0.50"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1.2.3"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("100000000000000000000000"), None);
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_cents(804533)), "$8045.33");
        assert_eq!(config.format_currency(Money::from_cents(1)), "$0.01");
        assert_eq!(config.format_currency(Money::from_cents(-500)), "-$5.00");
    }
}
