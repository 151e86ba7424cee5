//! # Mesa Terminal Entry Point
//!
//! ```text
//! stdin (JSON lines) ──► mesa-terminal ──► stdout (JSON lines)
//!                              │
//!                              └──► stderr (logs)
//! ```
//!
//! The actual setup is in lib.rs for better testability.

#[tokio::main]
async fn main() {
    if let Err(e) = mesa_terminal_lib::run().await {
        tracing::error!("Terminal failed: {}", e);
        eprintln!("mesa-terminal: {}", e);
        std::process::exit(1);
    }
}
