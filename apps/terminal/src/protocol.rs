//! # Request Protocol
//!
//! One JSON object per line in, one JSON object per line out.
//!
//! ```text
//! ──► {"command":"order_product","table_id":"table-1","product_id":"2","quantity":2}
//! ◄── {"ok":true,"data":{"id":"table-1","status":"occupied",...}}
//!
//! ──► {"command":"process_payment","table_id":"table-9","method":"cash"}
//! ◄── {"ok":false,"error":{"code":"PAYMENT_ERROR","message":"..."}}
//! ```
//!
//! Amounts are integer cents on the wire.

use mesa_core::{Money, OrderLine, PaymentMethod, TableStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::commands::{cashier, catalog, report, table};
use crate::error::ApiError;
use crate::state::{ConfigState, LedgerState};

/// Every operation the terminal accepts.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    // Catalog
    ListProducts {
        #[serde(default)]
        category: Option<String>,
    },
    GetProduct {
        product_id: String,
    },
    UpdateProductPrice {
        product_id: String,
        new_price: Money,
    },
    SetProductAvailability {
        product_id: String,
        available: bool,
    },

    // Tables
    ListTables {
        #[serde(default)]
        status: Option<TableStatus>,
    },
    GetTable {
        table_id: String,
    },
    AddOrderLine {
        table_id: String,
        line: OrderLine,
    },
    OrderProduct {
        table_id: String,
        product_id: String,
        #[serde(default = "one")]
        quantity: i64,
    },
    RemoveOrderLine {
        table_id: String,
        product_id: String,
    },
    ApplyDiscount {
        table_id: String,
        amount: Money,
        #[serde(default)]
        reason: Option<String>,
    },
    SplitBill {
        table_id: String,
        count: u32,
    },
    SetTableStatus {
        table_id: String,
        status: TableStatus,
    },

    // Cashier
    ProcessPayment {
        table_id: String,
        method: PaymentMethod,
    },
    ListTransactions {
        #[serde(default)]
        session_only: bool,
    },
    OpenCashier {
        initial_cash: Money,
    },
    CloseCashier {
        final_cash: Money,
        #[serde(default)]
        reason: Option<String>,
    },
    CashierStatus,
    SessionHistory,
    SetShift {
        label: String,
    },

    // Reports
    PreviewReport {
        #[serde(default)]
        counted_cash: Option<Money>,
    },
    SessionReport {
        session_id: String,
    },
    ExportReport {
        #[serde(default)]
        session_id: Option<String>,
        #[serde(default)]
        counted_cash: Option<Money>,
    },

    GetConfig,
}

fn one() -> i64 {
    1
}

/// Reply to one request line.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl Response {
    pub fn success(data: Value) -> Self {
        Response {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: ApiError) -> Self {
        Response {
            ok: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Parses and executes one request line.
pub async fn handle_line(line: &str, ledger: &LedgerState, config: &ConfigState) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Malformed request");
            return Response::failure(ApiError::validation(format!("Malformed request: {}", e)));
        }
    };

    match dispatch(request, ledger, config).await {
        Ok(data) => Response::success(data),
        Err(error) => {
            warn!(code = ?error.code, message = %error.message, "Request rejected");
            Response::failure(error)
        }
    }
}

/// Routes a request to its command function.
///
/// Only `export_report` awaits; every other command runs under the ledger
/// lock and returns without yielding.
pub async fn dispatch(
    request: Request,
    ledger: &LedgerState,
    config: &ConfigState,
) -> Result<Value, ApiError> {
    match request {
        Request::ListProducts { category } => {
            to_value(catalog::list_products(ledger, category.as_deref()))
        }
        Request::GetProduct { product_id } => to_value(catalog::get_product(ledger, &product_id)?),
        Request::UpdateProductPrice {
            product_id,
            new_price,
        } => to_value(catalog::update_product_price(ledger, product_id, new_price)?),
        Request::SetProductAvailability {
            product_id,
            available,
        } => to_value(catalog::set_product_availability(ledger, product_id, available)?),

        Request::ListTables { status } => to_value(table::list_tables(ledger, status)),
        Request::GetTable { table_id } => to_value(table::get_table(ledger, &table_id)?),
        Request::AddOrderLine { table_id, line } => {
            to_value(table::add_order_line(ledger, table_id, line)?)
        }
        Request::OrderProduct {
            table_id,
            product_id,
            quantity,
        } => to_value(table::order_product(ledger, table_id, product_id, quantity)?),
        Request::RemoveOrderLine {
            table_id,
            product_id,
        } => to_value(table::remove_order_line(ledger, table_id, product_id)?),
        Request::ApplyDiscount {
            table_id,
            amount,
            reason,
        } => to_value(table::apply_discount(ledger, table_id, amount, reason)?),
        Request::SplitBill { table_id, count } => {
            to_value(table::split_bill(ledger, table_id, count)?)
        }
        Request::SetTableStatus { table_id, status } => {
            to_value(table::set_table_status(ledger, table_id, status)?)
        }

        Request::ProcessPayment { table_id, method } => {
            to_value(cashier::process_payment(ledger, table_id, method)?)
        }
        Request::ListTransactions { session_only } => {
            to_value(cashier::list_transactions(ledger, session_only))
        }
        Request::OpenCashier { initial_cash } => {
            to_value(cashier::open_cashier(ledger, initial_cash)?)
        }
        Request::CloseCashier { final_cash, reason } => {
            to_value(cashier::close_cashier(ledger, final_cash, reason)?)
        }
        Request::CashierStatus => to_value(cashier::cashier_status(ledger)),
        Request::SessionHistory => to_value(cashier::session_history(ledger)),
        Request::SetShift { label } => to_value(cashier::set_shift(ledger, label)?),

        Request::PreviewReport { counted_cash } => {
            to_value(report::preview_report(ledger, counted_cash)?)
        }
        Request::SessionReport { session_id } => {
            to_value(report::session_report(ledger, &session_id)?)
        }
        Request::ExportReport {
            session_id,
            counted_cash,
        } => to_value(report::export_report(
            ledger,
            config,
            session_id.as_deref(),
            counted_cash,
        )
        .await?),

        Request::GetConfig => to_value(config),
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(format!("Serialization failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::fresh_stamp;
    use mesa_core::{Ledger, SeedConfig};
    use serde_json::json;

    fn setup() -> (LedgerState, ConfigState) {
        let ledger =
            LedgerState::new(Ledger::seeded(&SeedConfig::default(), &fresh_stamp()).unwrap());
        (ledger, ConfigState::default())
    }

    async fn send(line: Value, ledger: &LedgerState, config: &ConfigState) -> Response {
        handle_line(&line.to_string(), ledger, config).await
    }

    #[tokio::test]
    async fn test_order_and_pay_over_the_wire() {
        let (ledger, config) = setup();

        let res = send(
            json!({"command": "order_product", "table_id": "table-1", "product_id": "2"}),
            &ledger,
            &config,
        )
        .await;
        assert!(res.ok);
        let data = res.data.unwrap();
        assert_eq!(data["status"], "occupied");
        assert_eq!(data["total"], 1456800);

        let res = send(
            json!({"command": "process_payment", "table_id": "table-1", "method": "check"}),
            &ledger,
            &config,
        )
        .await;
        assert!(res.ok);
        assert_eq!(res.data.unwrap()["payment_method"], "check");

        let res = send(json!({"command": "cashier_status"}), &ledger, &config).await;
        assert_eq!(res.data.unwrap()["sales"]["check"], 1456800);
    }

    #[tokio::test]
    async fn test_rejections_become_error_responses() {
        let (ledger, config) = setup();

        let res = send(
            json!({"command": "split_bill", "table_id": "table-1", "count": 51}),
            &ledger,
            &config,
        )
        .await;
        assert!(!res.ok);
        assert_eq!(res.error.unwrap().code, ErrorCode::ValidationError);

        let res = send(
            json!({"command": "get_table", "table_id": "table-0"}),
            &ledger,
            &config,
        )
        .await;
        assert_eq!(res.error.unwrap().code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_malformed_lines() {
        let (ledger, config) = setup();

        let res = handle_line("not json", &ledger, &config).await;
        assert_eq!(res.error.unwrap().code, ErrorCode::ValidationError);

        let res = send(json!({"command": "teleport"}), &ledger, &config).await;
        assert_eq!(res.error.unwrap().code, ErrorCode::ValidationError);

        let res = send(
            json!({"command": "process_payment", "table_id": "table-1", "method": "bitcoin"}),
            &ledger,
            &config,
        )
        .await;
        assert!(!res.ok);
    }

    #[test]
    fn test_response_shape() {
        let json = serde_json::to_value(Response::success(json!([1]))).unwrap();
        assert_eq!(json, json!({"ok": true, "data": [1]}));

        let json = serde_json::to_value(Response::failure(ApiError::internal("boom"))).unwrap();
        assert_eq!(
            json,
            json!({"ok": false, "error": {"code": "INTERNAL", "message": "boom"}})
        );
    }

    #[tokio::test]
    async fn test_get_config() {
        let (ledger, config) = setup();
        let res = send(json!({"command": "get_config"}), &ledger, &config).await;
        let data = res.data.unwrap();
        assert_eq!(data["tableCount"], 12);
        assert_eq!(data["initialCash"], 10000);
    }

    #[tokio::test]
    async fn test_huge_amounts_are_rejected_not_wrapped() {
        let (ledger, config) = setup();
        let huge = i64::MAX / 2 + 1;

        let res = send(
            json!({"command": "update_product_price", "product_id": "2", "new_price": huge}),
            &ledger,
            &config,
        )
        .await;
        assert_eq!(res.error.unwrap().code, ErrorCode::ValidationError);

        let line = json!({
            "product_id": "custom",
            "product_name": "Banquet",
            "quantity": 1,
            "unit_price": huge,
            "total": huge,
            "ordered_at": "2026-01-01T12:00:00Z"
        });
        for _ in 0..2 {
            let res = send(
                json!({"command": "add_order_line", "table_id": "table-1", "line": line}),
                &ledger,
                &config,
            )
            .await;
            assert_eq!(res.error.unwrap().code, ErrorCode::ValidationError);
        }

        let res = send(
            json!({"command": "get_table", "table_id": "table-1"}),
            &ledger,
            &config,
        )
        .await;
        assert_eq!(res.data.unwrap()["total"], 0);
    }
}
