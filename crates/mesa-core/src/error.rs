//! # Error Types
//!
//! Domain-specific error types for mesa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mesa-core errors (this file)                                          │
//! │  ├── CoreError        - Rejected ledger transitions                    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  mesa-terminal errors (app)                                            │
//! │  └── ApiError         - What the caller sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → JSON response          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected command never changes the ledger: `Ledger::apply` builds the
//! next snapshot on the side and only returns it on success.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Reasons a ledger command is rejected.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Removal asked for a product that has no line on the table.
    #[error("Table {table_id} has no order line for product {product_id}")]
    OrderLineNotFound {
        table_id: String,
        product_id: String,
    },

    #[error("Product {0} is not available")]
    ProductUnavailable(String),

    /// Payment requested for a table that has nothing to pay.
    ///
    /// ## When This Occurs
    /// - Table is `available` or `waiting_cleaning`
    /// - Table is `occupied` but every line was removed
    #[error("Table {table_id} has nothing to settle (status {status})")]
    NothingToSettle { table_id: String, status: String },

    /// Discount larger than the bill it applies to.
    #[error("Discount {discount} exceeds subtotal {subtotal}")]
    DiscountExceedsSubtotal { discount: Money, subtotal: Money },

    /// Closing the cashier or taking a payment with no open session.
    #[error("No cashier session is open")]
    NoOpenSession,

    #[error("Cashier session {0} is already open")]
    SessionAlreadyOpen(String),

    /// Counted cash differs from the expected amount and no reason was given.
    ///
    /// ## User Workflow
    /// ```text
    /// Initial cash 100.00 + cash sales 50.00 = expected 150.00
    ///      │
    ///      ▼
    /// Counted 145.00 → difference -5.00
    ///      │
    ///      ▼
    /// JustificationRequired { difference: -5.00 }
    ///      │
    ///      ▼
    /// UI asks for a reason, then retries the close
    /// ```
    #[error("Cash difference of {difference} requires a justification")]
    JustificationRequired { difference: Money },

    /// A running total (table subtotal, session sales, expected cash) would
    /// no longer fit in `Money`.
    #[error("{0} is too large")]
    AmountOverflow(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A session report could not be encoded or decoded.
    #[error("Report format error: {0}")]
    ReportFormat(#[from] serde_json::Error),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before a transition runs, so the ledger enforces the same rules no
/// matter which front end sent the command.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DiscountExceedsSubtotal {
            discount: Money::from_major(50),
            subtotal: Money::from_major(20),
        };
        assert_eq!(err.to_string(), "Discount $50.00 exceeds subtotal $20.00");

        let err = CoreError::JustificationRequired {
            difference: Money::from_major(-5),
        };
        assert_eq!(
            err.to_string(),
            "Cash difference of -$5.00 requires a justification"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "initial cash".to_string(),
        };
        assert_eq!(err.to_string(), "initial cash must be positive");

        let err = ValidationError::OutOfRange {
            field: "split count".to_string(),
            min: 2,
            max: 50,
        };
        assert_eq!(err.to_string(), "split count must be between 2 and 50");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "reason".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
