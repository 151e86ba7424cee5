//! # Ledger State
//!
//! Holds the single live ledger snapshot of the terminal.
//!
//! ## Thread Safety
//! The ledger is wrapped in `Arc<Mutex<T>>` because:
//! 1. Every command reads or replaces the same snapshot
//! 2. Only one command may apply a transition at a time
//! 3. Requests are served from an async runtime
//!
//! ## Transition Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger State Operations                              │
//! │                                                                         │
//! │  Command                 LedgerState                  Snapshot          │
//! │  ───────                 ───────────                  ────────          │
//! │                                                                         │
//! │  order_product ────────► dispatch() ──► lock ──► apply(cmd, stamp)     │
//! │                                                     │                   │
//! │                                          Ok ◄───────┴───────► Err       │
//! │                                          │                     │        │
//! │                              *guard = new ledger      snapshot untouched│
//! │                                                                         │
//! │  list_tables ──────────► with_ledger() ──► lock ──► read only          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use mesa_core::{Command, CoreResult, Event, Ledger, Stamp, Transition};
use tracing::debug;
use uuid::Uuid;

/// Wrapper for the ledger state.
#[derive(Clone)]
pub struct LedgerState {
    ledger: Arc<Mutex<Ledger>>,
}

impl LedgerState {
    pub fn new(ledger: Ledger) -> Self {
        LedgerState {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }

    /// Executes a read-only closure against the current snapshot.
    pub fn with_ledger<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Ledger) -> R,
    {
        let guard = self.lock();
        f(&guard)
    }

    /// Applies a command stamped with the current time and a fresh id.
    pub fn dispatch(&self, command: Command) -> CoreResult<Event> {
        self.dispatch_stamped(command, &fresh_stamp())
    }

    /// Applies a command with a caller-provided stamp.
    ///
    /// The snapshot is replaced only when the transition succeeds.
    pub fn dispatch_stamped(&self, command: Command, stamp: &Stamp) -> CoreResult<Event> {
        let mut guard = self.lock();
        let Transition { ledger, event } = guard.apply(command, stamp)?;
        *guard = ledger;
        debug!(stamp_id = %stamp.id, "Ledger transition applied");
        Ok(event)
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        // Snapshots are swapped whole, so a poisoned lock still guards a consistent ledger.
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Stamp for a transition happening now.
pub fn fresh_stamp() -> Stamp {
    Stamp::new(Utc::now(), Uuid::new_v4().to_string())
}
