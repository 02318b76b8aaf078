//! Ledger service abstraction.
//!
//! The matching engine never talks to the ledger platform directly; it
//! consumes the [`LedgerService`] trait, which models the small surface
//! the engine needs:
//!
//! - account lookup and account property updates
//! - transaction queries by expression ([`TxQuery`])
//! - lookup by remote-id cross-reference
//! - batch create / update / trash of transactions
//! - the book's fractional-digit precision
//!
//! Production deployments implement the trait against the real platform
//! API. [`MemoryLedger`] is the in-process reference implementation used
//! by the test suites and the CLI snapshot runner.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod memory;
mod query;

pub use error::ServiceError;
pub use memory::{MemoryBook, MemoryLedger};
pub use query::TxQuery;

use lotledger_core::{Account, TxDraft, TxRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one book (ledger) on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookId(String);

impl BookId {
    /// Create a book id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BookId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The paired financial and inventory books one engine pass operates on.
///
/// Goods movements live in the inventory book; money, additional costs
/// and synthesized COGS postings live in the financial book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPair {
    /// The financial (money) book.
    pub financial: BookId,
    /// The inventory (quantities) book.
    pub inventory: BookId,
}

impl BookPair {
    /// Pair a financial book with its inventory book.
    #[must_use]
    pub fn new(financial: impl Into<BookId>, inventory: impl Into<BookId>) -> Self {
        Self {
            financial: financial.into(),
            inventory: inventory.into(),
        }
    }
}

impl From<String> for BookId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The ledger platform surface consumed by the engine.
///
/// Reads take `&self`; every mutation takes `&mut self` so one service
/// value cannot be mutated from two passes at once. Batch operations are
/// the only way the engine writes transactions.
pub trait LedgerService {
    /// The book's configured fractional-digit precision.
    fn fraction_digits(&self, book: &BookId) -> Result<u32, ServiceError>;

    /// Look up an account by id.
    fn get_account(&self, book: &BookId, account_id: &str) -> Result<Account, ServiceError>;

    /// Look up an account by name, if it exists.
    fn find_account_by_name(
        &self,
        book: &BookId,
        name: &str,
    ) -> Result<Option<Account>, ServiceError>;

    /// Persist an account's properties.
    fn update_account(&mut self, book: &BookId, account: &Account) -> Result<(), ServiceError>;

    /// Query transactions matching an expression.
    fn query_transactions(
        &self,
        book: &BookId,
        query: &TxQuery,
    ) -> Result<Vec<TxRecord>, ServiceError>;

    /// Find the transaction carrying a remote-id cross-reference, if any.
    fn find_by_remote_id(
        &self,
        book: &BookId,
        remote_id: &str,
    ) -> Result<Option<TxRecord>, ServiceError>;

    /// Create a batch of transactions, returning the created records in
    /// input order with their ledger-assigned ids.
    fn batch_create(
        &mut self,
        book: &BookId,
        drafts: &[TxDraft],
    ) -> Result<Vec<TxRecord>, ServiceError>;

    /// Update a batch of existing transactions.
    fn batch_update(&mut self, book: &BookId, records: &[TxRecord]) -> Result<(), ServiceError>;

    /// Move a batch of transactions to the trash.
    fn batch_trash(&mut self, book: &BookId, ids: &[String]) -> Result<(), ServiceError>;
}
