//! Shared command implementations for the `lots-*` binaries.

pub mod calc;
pub mod reset;

use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

/// Initialize logging for a verbose run.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_span_events(FmtSpan::CLOSE)
        .init();
}
