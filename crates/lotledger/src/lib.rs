//! Lotledger CLI tools.
//!
//! This crate provides command-line delivery adapters for the matching
//! engine:
//!
//! - `lots-calc`: compute cost of goods sold for one tracked good
//! - `lots-reset`: reverse a previous calculation
//!
//! Both operate on a JSON ledger snapshot through the in-memory service
//! implementation; deployments talking to a live ledger platform swap in
//! their own [`LedgerService`](lotledger_service::LedgerService) behind
//! the same engine.
//!
//! # Example Usage
//!
//! ```bash
//! lots-calc ledger.json --account i_widgets --as-of 2024-03-01
//! lots-reset ledger.json --account i_widgets
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
pub mod snapshot;
