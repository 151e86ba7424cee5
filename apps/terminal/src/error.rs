//! # API Error Type
//!
//! Unified error type for terminal commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Mesa POS                               │
//! │                                                                         │
//! │  {"command":"close_cashier","final_cash":14500}                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function  →  Result<T, ApiError>                        │  │
//! │  │         │                                                        │  │
//! │  │  Ledger rejected? ── CoreError::JustificationRequired ──┐        │  │
//! │  │         │                                               ▼        │  │
//! │  │  Report write failed? ── io::Error ───────────────► ApiError     │  │
//! │  │         │                                               │        │  │
//! │  │  Success ───────────────────────────────────────────────┼──────► │  │
//! │  └─────────────────────────────────────────────────────────┼────────┘  │
//! │                                                            ▼           │
//! │  {"ok":false,"error":{"code":"CASHIER_ERROR","message":"..."}}         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mesa_core::CoreError;
use serde::Serialize;
use thiserror::Error;

/// Error returned from terminal commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Table not found: table-99"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("[{code:?}] {message}")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown table, product, order line or session
    NotFound,

    /// Input validation failed, including malformed requests
    ValidationError,

    /// Command is valid but not allowed in the current state
    BusinessLogic,

    /// Cashier session open/close rules
    CashierError,

    /// Payment could not be taken
    PaymentError,

    /// Anything the caller cannot fix
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts ledger rejections to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::TableNotFound(id) => ApiError::not_found("Table", &id),
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::OrderLineNotFound { .. } => ApiError::new(ErrorCode::NotFound, message),
            CoreError::ProductUnavailable(_) | CoreError::DiscountExceedsSubtotal { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, message)
            }
            CoreError::NothingToSettle { .. } => ApiError::new(ErrorCode::PaymentError, message),
            CoreError::NoOpenSession
            | CoreError::SessionAlreadyOpen(_)
            | CoreError::JustificationRequired { .. } => {
                ApiError::new(ErrorCode::CashierError, message)
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
            CoreError::AmountOverflow(_) => ApiError::validation(message),
            CoreError::ReportFormat(e) => {
                tracing::error!("Report encoding failed: {}", e);
                ApiError::internal("Report could not be encoded")
            }
        }
    }
}

/// Converts report file errors to API errors.
impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Report write failed: {}", err);
        ApiError::internal(format!("Report could not be written: {}", err))
    }
}
