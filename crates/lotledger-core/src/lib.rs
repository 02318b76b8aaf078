//! Core types for lotledger
//!
//! This crate provides the fundamental types used throughout the lotledger
//! project:
//!
//! - [`TxRecord`] / [`TxDraft`] - Ledger transactions as read from and staged
//!   into the ledger service
//! - [`Properties`] - The custom key/value tags carried by ledger records
//! - [`TrackedGood`] - An inventory account representing one fungible good
//! - [`Lot`] - A purchase record consumed in FIFO order by sales
//! - [`SaleRecord`] / [`CreditNote`] - The other half of the matching domain
//! - [`ConsumptionEntry`] - Audit log entries written on matched records
//! - [`FifoKey`] - The composite ordering key for FIFO matching
//! - [`Summary`] - The per-invocation result value
//!
//! # Example
//!
//! ```
//! use lotledger_core::{FifoKey, FifoOrdered, Lot};
//! use rust_decimal_macros::dec;
//! use chrono::NaiveDate;
//!
//! let lot = Lot::new("tx_1", "INV-001", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
//!     .with_quantity(dec!(10))
//!     .with_cost(dec!(100.00));
//!
//! assert_eq!(lot.unit_cost(), dec!(10));
//! assert_eq!(lot.fifo_key(), FifoKey::new(lot.date, 0, 0));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fifo;
pub mod good;
pub mod log;
pub mod lot;
pub mod properties;
pub mod record;
pub mod sale;
pub mod summary;

pub use fifo::{sort_fifo, FifoKey, FifoOrdered};
pub use good::TrackedGood;
pub use log::ConsumptionEntry;
pub use lot::{Lot, LotSplit};
pub use properties::{keys, Properties};
pub use record::{Account, AccountKind, AccountRef, TxDraft, TxRecord};
pub use sale::{CreditNote, SaleRecord};
pub use summary::Summary;

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;

/// Check whether a quantity rounds to zero at the given fractional-digit
/// precision.
///
/// Repeated unit-cost divisions leave rounding dust on the remaining
/// quantity of a nearly-consumed sale; equality-to-zero decisions must
/// round at the book's configured precision before comparing.
#[must_use]
pub fn rounds_to_zero(value: Decimal, fraction_digits: u32) -> bool {
    value.round_dp(fraction_digits).is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rounds_to_zero() {
        assert!(rounds_to_zero(dec!(0), 2));
        assert!(rounds_to_zero(dec!(0.0001), 2));
        assert!(rounds_to_zero(dec!(-0.004), 2));
        assert!(!rounds_to_zero(dec!(0.01), 2));
        assert!(!rounds_to_zero(dec!(0.006), 2));
    }

    #[test]
    fn test_rounds_to_zero_precision_zero() {
        assert!(rounds_to_zero(dec!(0.4), 0));
        assert!(!rounds_to_zero(dec!(0.6), 0));
    }
}
