//! Service error types.

use thiserror::Error;

/// Errors surfaced by a [`LedgerService`](crate::LedgerService)
/// implementation.
///
/// The engine treats every variant as a hard failure: a pass either
/// completes against a healthy service or propagates the error without
/// attempting partial rollback.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The book id is not known to the service.
    #[error("unknown book: {0}")]
    UnknownBook(String),

    /// An account lookup failed.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// A transaction referenced by id does not exist.
    #[error("transaction not found: {0}")]
    TransactionNotFound(String),

    /// The service refused to mutate an administratively locked record.
    #[error("transaction {0} is locked")]
    Locked(String),

    /// A draft referenced an account name the book does not contain.
    #[error("unknown account '{name}' in book {book}")]
    UnknownAccount {
        /// The unresolved account name.
        name: String,
        /// The book the lookup ran against.
        book: String,
    },

    /// The platform transport failed (network, quota, service outage).
    #[error("ledger transport failure: {0}")]
    Transport(String),
}
