//! FIFO ordering for lots and sales.
//!
//! Matching consumes purchase lots in First-In-First-Out order. The order
//! is defined by a composite key: transaction date first, then an explicit
//! numeric `order` property (absent means 0), then the ledger creation
//! timestamp. The derived lexicographic [`Ord`] over those three fields is
//! a total order; records with identical keys are indistinguishable to the
//! algorithm and keep their incoming order under the stable sort.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Composite FIFO ordering key: `(date, order, created_at)` ascending.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FifoKey {
    /// Transaction date (primary key).
    pub date: NaiveDate,
    /// Explicit order property (first tie-break, default 0).
    pub order: i64,
    /// Creation timestamp in epoch milliseconds (second tie-break).
    pub created_at: i64,
}

impl FifoKey {
    /// Create a key from its components.
    #[must_use]
    pub const fn new(date: NaiveDate, order: i64, created_at: i64) -> Self {
        Self {
            date,
            order,
            created_at,
        }
    }
}

/// Types that participate in FIFO matching.
pub trait FifoOrdered {
    /// The composite key this record sorts by.
    fn fifo_key(&self) -> FifoKey;
}

/// Sort records into FIFO order.
///
/// The sort is stable, so records with equal keys keep their relative
/// positions.
pub fn sort_fifo<T: FifoOrdered>(records: &mut [T]) {
    records.sort_by_key(FifoOrdered::fifo_key);
}
