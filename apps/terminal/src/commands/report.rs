//! # Report Commands
//!
//! Session report preview and export.
//!
//! ## Export
//! ```text
//! export_report ──► SessionReport::to_json ──► <report_dir>/cashier-report-YYYY-MM-DD.json
//! ```
//! A second export on the same day replaces the earlier file.

use std::path::PathBuf;

use chrono::Utc;
use mesa_core::{CoreError, Money, SessionReport};
use serde::Serialize;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{ApiError, ErrorCode};
use crate::state::{ConfigState, LedgerState};

/// Where an exported report was written.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedReport {
    pub path: PathBuf,
    pub report: SessionReport,
}

/// Report of the open session as of now.
///
/// `counted_cash` defaults to the expected drawer, giving a zero difference.
pub fn preview_report(
    ledger: &LedgerState,
    counted_cash: Option<Money>,
) -> Result<SessionReport, ApiError> {
    debug!(?counted_cash, "preview_report command");
    ledger.with_ledger(|l| {
        let counted = counted_cash
            .or_else(|| l.expected_cash())
            .ok_or(CoreError::NoOpenSession)?;
        Ok(SessionReport::preview(l, counted, Utc::now())?)
    })
}

/// Report of a closed session.
pub fn session_report(ledger: &LedgerState, session_id: &str) -> Result<SessionReport, ApiError> {
    debug!(session_id, "session_report command");
    ledger.with_ledger(|l| {
        let session = l
            .sessions()
            .iter()
            .find(|s| s.id == session_id)
            .ok_or_else(|| ApiError::not_found("Session", session_id))?;
        SessionReport::from_closed_session(session).ok_or_else(|| {
            ApiError::new(
                ErrorCode::CashierError,
                format!("Session {} is still open", session_id),
            )
        })
    })
}

/// Writes a report into the configured report directory.
///
/// With a `session_id` the closed session is exported, otherwise a preview
/// of the open one. The ledger lock is released before any file I/O.
pub async fn export_report(
    ledger: &LedgerState,
    config: &ConfigState,
    session_id: Option<&str>,
    counted_cash: Option<Money>,
) -> Result<ExportedReport, ApiError> {
    debug!(?session_id, "export_report command");

    let report = match session_id {
        Some(id) => session_report(ledger, id)?,
        None => preview_report(ledger, counted_cash)?,
    };

    fs::create_dir_all(&config.report_dir).await?;
    let path = config.report_dir.join(report.file_name());
    fs::write(&path, report.to_json()?).await?;

    info!(
        ?path,
        total_sales = %config.format_currency(report.total_sales),
        difference = %config.format_currency(report.difference),
        "Session report exported"
    );

    Ok(ExportedReport { path, report })
}
