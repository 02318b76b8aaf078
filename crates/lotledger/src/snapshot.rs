//! JSON ledger snapshots.
//!
//! A snapshot is the whole state the CLI operates on: the two book ids
//! and the in-memory ledger holding them. Commands load a snapshot, run
//! the engine, and write the mutated ledger back in place.

use anyhow::{Context, Result};
use lotledger_service::{BookPair, MemoryLedger};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A ledger snapshot file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Id of the financial book inside `ledger`.
    pub financial_book: String,
    /// Id of the inventory book inside `ledger`.
    pub inventory_book: String,
    /// The ledger itself.
    pub ledger: MemoryLedger,
}

impl Snapshot {
    /// The book pair this snapshot describes.
    #[must_use]
    pub fn books(&self) -> BookPair {
        BookPair::new(self.financial_book.as_str(), self.inventory_book.as_str())
    }
}

/// Load a snapshot from disk.
pub fn load(path: &Path) -> Result<Snapshot> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Write a snapshot back to disk.
pub fn save(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let raw = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, raw).with_context(|| format!("failed to write {}", path.display()))
}
