//! # Mesa Terminal Library
//!
//! Runs one POS terminal: seeds the ledger, then serves JSON-line requests
//! from stdin and answers on stdout. Logs go to stderr.
//!
//! ## Module Organization
//! ```text
//! mesa_terminal_lib/
//! ├── lib.rs          ◄─── You are here (startup & request loop)
//! ├── protocol.rs     ◄─── Request/Response types and routing
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── ledger.rs   ◄─── Single-writer ledger state
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── catalog.rs  ◄─── Menu commands
//! │   ├── table.rs    ◄─── Order/discount/split commands
//! │   ├── cashier.rs  ◄─── Payment and session commands
//! │   └── report.rs   ◄─── Report preview/export
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod protocol;
pub mod state;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use mesa_core::Ledger;
use state::{fresh_stamp, ConfigState, LedgerState};

/// Runs the terminal until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Terminal Startup                                  │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • MESA_* environment variables over defaults                        │
/// │                                                                         │
/// │  3. Seed Ledger ──────────────────────────────────────────────────────► │
/// │     • Six-item menu, table pool, first cashier session open             │
/// │                                                                         │
/// │  4. Serve ────────────────────────────────────────────────────────────► │
/// │     • One JSON request per stdin line, one response per stdout line     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ConfigState::from_env();
    info!(
        store = %config.store_name,
        shift = %config.shift,
        tables = config.table_count,
        report_dir = ?config.report_dir,
        "Starting Mesa POS terminal"
    );

    let ledger = Ledger::seeded(&config.seed_config(), &fresh_stamp())?;
    let ledger = LedgerState::new(ledger);
    info!(
        float = %config.format_currency(config.initial_cash),
        "Ledger seeded, cashier session open"
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve(stdin, stdout, &ledger, &config).await?;

    info!("Input closed, terminal stopping");
    Ok(())
}

/// Answers every request line from `reader` on `writer`.
///
/// Blank lines are skipped. Returns when `reader` reaches end of input.
pub async fn serve<R, W>(
    reader: R,
    mut writer: W,
    ledger: &LedgerState,
    config: &ConfigState,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!(request = line, "Request received");

        let response = protocol::handle_line(line, ledger, config).await;
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=mesa=trace` - Show trace for mesa crates only
/// - Default: INFO, DEBUG for mesa crates
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,mesa=debug"));

    // stdout carries responses
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesa_core::SeedConfig;
    use serde_json::Value;

    fn ledger() -> LedgerState {
        LedgerState::new(Ledger::seeded(&SeedConfig::default(), &fresh_stamp()).unwrap())
    }

    async fn exchange(input: &str, ledger: &LedgerState) -> Vec<Value> {
        let mut output = Vec::new();
        serve(input.as_bytes(), &mut output, ledger, &ConfigState::default())
            .await
            .unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_serve_answers_each_line() {
        let ledger = ledger();
        let input = concat!(
            r#"{"command":"order_product","table_id":"table-1","product_id":"2","quantity":2}"#,
            "\n\n",
            r#"{"command":"apply_discount","table_id":"table-1","amount":500000,"reason":"birthday"}"#,
            "\n",
            r#"{"command":"split_bill","table_id":"table-1","count":3}"#,
            "\n",
            r#"{"command":"process_payment","table_id":"table-1","method":"card"}"#,
            "\n",
        );

        let responses = exchange(input, &ledger).await;
        assert_eq!(responses.len(), 4);
        assert!(responses.iter().all(|r| r["ok"] == true));
        assert_eq!(responses[2]["data"]["per_person_share"], 804533);
        assert_eq!(responses[3]["data"]["total"], 2413600);
        assert_eq!(ledger.with_ledger(|l| l.transactions().len()), 1);
    }

    #[tokio::test]
    async fn test_serve_keeps_going_after_errors() {
        let ledger = ledger();
        let input = "garbage\n{\"command\":\"cashier_status\"}\n";

        let responses = exchange(input, &ledger).await;
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["ok"], false);
        assert_eq!(responses[0]["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(responses[1]["data"]["open"], true);
    }
}
