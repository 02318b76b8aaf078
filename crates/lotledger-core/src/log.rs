//! Consumption log entries.
//!
//! Every matched portion of a lot produces one entry on the sale's
//! purchase log and one on the lot's liquidation log. Entries are written
//! to ledger properties as JSON for audit and debugging; the algorithm
//! never parses them back.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One immutable consumption record.
///
/// On a sale's purchase log, `tx_id` names the lot consumed; on a lot's
/// liquidation log it names the consuming sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionEntry {
    /// The counterpart transaction id.
    pub tx_id: String,
    /// Quantity consumed.
    pub quantity: Decimal,
    /// Unit cost at consumption time.
    pub unit_cost: Decimal,
    /// Date of the consuming sale.
    pub date: NaiveDate,
}

impl ConsumptionEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(
        tx_id: impl Into<String>,
        quantity: Decimal,
        unit_cost: Decimal,
        date: NaiveDate,
    ) -> Self {
        Self {
            tx_id: tx_id.into(),
            quantity,
            unit_cost,
            date,
        }
    }

    /// Serialize a log to the JSON form stored in a ledger property.
    #[must_use]
    pub fn log_to_json(entries: &[Self]) -> String {
        serde_json::to_string(entries).unwrap_or_else(|_| "[]".to_string())
    }

    /// Parse a log from its property form. Malformed input yields an
    /// empty log.
    #[must_use]
    pub fn log_from_json(raw: &str) -> Vec<Self> {
        serde_json::from_str(raw).unwrap_or_default()
    }
}
