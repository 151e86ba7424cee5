//! # Validation Module
//!
//! Input validation for ledger commands.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: View layer                                                   │
//! │  ├── Disabled buttons, numeric inputs                                  │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Request decoding (mesa-terminal)                             │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Ledger::apply                                                │
//! │  └── THIS MODULE: amounts, quantities, counts, free text               │
//! │                                                                         │
//! │  Layer 3 runs for every command, whatever front end sent it.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mesa_core::validation::{validate_quantity, validate_split_count};
//!
//! assert!(validate_quantity(2).is_ok());
//! assert!(validate_split_count(1).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::OrderLine;
use crate::{
    MAX_CASH_CENTS, MAX_ITEM_QUANTITY, MAX_PRICE_CENTS, MAX_SPLIT_COUNT, MAX_TEXT_LEN,
    MIN_SPLIT_COUNT,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a menu or unit price.
///
/// Zero is allowed (complimentary items); negative is not. Capped at
/// `MAX_PRICE_CENTS` so a full line of 999 never overflows.
///
/// ```rust
/// use mesa_core::money::Money;
/// use mesa_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_major(12207)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-1)).is_err());
/// assert!(validate_price(Money::from_cents(i64::MAX)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    within("price", price, 0, MAX_PRICE_CENTS)
}

/// Validates a discount amount. The subtotal bound is checked by the ledger.
pub fn validate_discount(amount: Money) -> ValidationResult<()> {
    non_negative("discount", amount)
}

/// Validates the number of guests a bill is split between (2..=50).
pub fn validate_split_count(count: u32) -> ValidationResult<()> {
    if !(MIN_SPLIT_COUNT..=MAX_SPLIT_COUNT).contains(&count) {
        return Err(ValidationError::OutOfRange {
            field: "split count".to_string(),
            min: i64::from(MIN_SPLIT_COUNT),
            max: i64::from(MAX_SPLIT_COUNT),
        });
    }

    Ok(())
}

/// Validates the float a cashier session opens with. Must be positive.
pub fn validate_initial_cash(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "initial cash".to_string(),
        });
    }

    within("initial cash", amount, 1, MAX_CASH_CENTS)
}

/// Validates the counted cash at close. Zero is a valid (empty) drawer.
pub fn validate_final_cash(amount: Money) -> ValidationResult<()> {
    within("final cash", amount, 0, MAX_CASH_CENTS)
}

fn within(field: &str, amount: Money, min: i64, max: i64) -> ValidationResult<()> {
    if !(min..=max).contains(&amount.cents()) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        });
    }

    Ok(())
}

fn non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Order Line Validator
// =============================================================================

/// Validates a fully-formed order line handed to the ledger.
///
/// ## Rules
/// - Product id and name are required
/// - Quantity and unit price pass their own validators
/// - `total` equals `quantity × unit_price`
pub fn validate_order_line(line: &OrderLine) -> ValidationResult<()> {
    if line.product_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }

    if line.product_name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product name".to_string(),
        });
    }

    validate_quantity(line.quantity)?;
    validate_price(line.unit_price)?;

    if line.unit_price.checked_multiply_quantity(line.quantity) != Some(line.total) {
        return Err(ValidationError::InvalidFormat {
            field: "line total".to_string(),
            reason: format!(
                "{} does not equal {} x {}",
                line.total, line.quantity, line.unit_price
            ),
        });
    }

    Ok(())
}

// =============================================================================
// Text Validators
// =============================================================================

/// Normalizes optional free text (discount reason, cash justification).
///
/// Blank input becomes `None`; the result is trimmed.
pub fn normalize_reason(reason: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };

    if reason.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(Some(reason.to_string()))
}

/// Validates a shift label such as "Morning". Returns it trimmed.
pub fn validate_shift_label(label: &str) -> ValidationResult<String> {
    let label = label.trim();

    if label.is_empty() {
        return Err(ValidationError::Required {
            field: "shift".to_string(),
        });
    }

    if label.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "shift".to_string(),
            max: 50,
        });
    }

    Ok(label.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_discount(Money::zero()).is_ok());
        assert!(validate_discount(Money::from_cents(-1)).is_err());

        assert!(validate_initial_cash(Money::from_major(100)).is_ok());
        assert!(validate_initial_cash(Money::zero()).is_err());
        assert!(validate_initial_cash(Money::from_cents(-100)).is_err());

        assert!(validate_final_cash(Money::zero()).is_ok());
        assert!(validate_final_cash(Money::from_cents(-1)).is_err());
    }

    #[test]
    fn test_amount_upper_bounds() {
        assert!(validate_price(Money::from_cents(MAX_PRICE_CENTS)).is_ok());
        assert!(matches!(
            validate_price(Money::from_cents(MAX_PRICE_CENTS + 1)),
            Err(ValidationError::OutOfRange { max: MAX_PRICE_CENTS, .. })
        ));

        assert!(validate_initial_cash(Money::from_cents(MAX_CASH_CENTS)).is_ok());
        assert!(validate_initial_cash(Money::from_cents(MAX_CASH_CENTS + 1)).is_err());
        assert!(validate_final_cash(Money::from_cents(i64::MAX)).is_err());
    }

    #[test]
    fn test_order_line_with_huge_price_is_rejected() {
        let unit_price = Money::from_cents(i64::MAX / 2 + 1);
        let line = OrderLine {
            product_id: "9".to_string(),
            product_name: "Gold Leaf Platter".to_string(),
            quantity: 2,
            unit_price,
            total: Money::zero(),
            ordered_at: Utc::now(),
        };

        assert!(matches!(
            validate_order_line(&line),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_split_count() {
        assert!(validate_split_count(2).is_ok());
        assert!(validate_split_count(50).is_ok());
        assert!(validate_split_count(0).is_err());
        assert!(validate_split_count(1).is_err());
        assert!(validate_split_count(51).is_err());
    }

    #[test]
    fn test_validate_order_line() {
        let now = Utc::now();
        let good = OrderLine::new("2", "Margherita Pizza", 2, Money::from_major(14568), now);
        assert!(validate_order_line(&good).is_ok());

        let mut tampered = good.clone();
        tampered.total = Money::from_major(1);
        assert!(matches!(
            validate_order_line(&tampered),
            Err(ValidationError::InvalidFormat { .. })
        ));

        let zero_qty = OrderLine::new("2", "Margherita Pizza", 0, Money::from_major(1), now);
        assert!(validate_order_line(&zero_qty).is_err());

        let nameless = OrderLine::new("2", "  ", 1, Money::from_major(1), now);
        assert!(validate_order_line(&nameless).is_err());
    }

    #[test]
    fn test_normalize_reason() {
        assert_eq!(normalize_reason(None).unwrap(), None);
        assert_eq!(normalize_reason(Some("   ")).unwrap(), None);
        assert_eq!(
            normalize_reason(Some("  promo ")).unwrap(),
            Some("promo".to_string())
        );
        assert!(normalize_reason(Some(&"x".repeat(MAX_TEXT_LEN + 1))).is_err());
    }

    #[test]
    fn test_validate_shift_label() {
        assert_eq!(validate_shift_label(" Evening ").unwrap(), "Evening");
        assert!(validate_shift_label("").is_err());
        assert!(validate_shift_label(&"A".repeat(51)).is_err());
    }
}
