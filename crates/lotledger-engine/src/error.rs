//! Engine error types.

use lotledger_service::ServiceError;
use thiserror::Error;

/// Hard failures during an engine pass.
///
/// Data-invariant violations and lock conflicts are not errors at this
/// level; they come back as [`Summary`](lotledger_core::Summary) values
/// with the error flag set and nothing mutated. An `EngineError` means
/// the ledger service itself failed and the caller should re-run the
/// whole pass once the service is healthy; the checked-flag guards make
/// the re-run idempotent.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The ledger service failed mid-pass or mid-commit.
    #[error("ledger service error: {0}")]
    Service(#[from] ServiceError),
}

/// Data-invariant violations detected before any mutation is staged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Aggregate sold quantity exceeds aggregate purchased quantity.
    SalesExceedPurchases,
    /// A credit note exceeds what remains in its purchase lot.
    CreditNoteExceedsLot,
}
