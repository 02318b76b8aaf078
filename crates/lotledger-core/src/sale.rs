//! Sales and credit notes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{keys, ConsumptionEntry, FifoKey, FifoOrdered, TxRecord};

/// A sale of a tracked good, to be matched against purchase lots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Id of the backing inventory transaction.
    pub tx_id: String,
    /// Sale date.
    pub date: NaiveDate,
    /// Quantity sold.
    pub quantity: Decimal,
    /// True once the sale has been fully matched.
    pub checked: bool,
    /// Total cost of sale, set when matching completes.
    pub total_cost: Option<Decimal>,
    /// Ordered consumption entries, one per lot portion consumed.
    pub purchase_log: Vec<ConsumptionEntry>,
    /// Sale invoice reference carried onto the COGS posting.
    pub invoice: Option<String>,
    /// Explicit FIFO tie-break.
    pub order: i64,
    /// Ledger creation timestamp, epoch milliseconds.
    pub created_at: i64,
}

impl SaleRecord {
    /// Create a sale with zero quantity.
    #[must_use]
    pub fn new(tx_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            tx_id: tx_id.into(),
            date,
            quantity: Decimal::ZERO,
            checked: false,
            total_cost: None,
            purchase_log: Vec::new(),
            invoice: None,
            order: 0,
            created_at: 0,
        }
    }

    /// Set the quantity sold.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    /// Lift a classified inventory transaction into a sale.
    #[must_use]
    pub fn from_record(record: &TxRecord) -> Self {
        let props = &record.properties;
        Self {
            tx_id: record.id.clone(),
            date: record.date,
            quantity: record.amount,
            checked: record.checked,
            total_cost: props.get_decimal(keys::TOTAL_COST),
            purchase_log: props
                .get(keys::PURCHASE_LOG)
                .map(ConsumptionEntry::log_from_json)
                .unwrap_or_default(),
            invoice: props
                .get(keys::SALE_INVOICE)
                .map(ToString::to_string)
                .or_else(|| {
                    (!record.description.is_empty()).then(|| record.description.clone())
                }),
            order: record.order(),
            created_at: record.created_at,
        }
    }

    /// Finalize the sale as fully matched.
    pub fn finalize(&mut self, total_cost: Decimal, purchase_log: Vec<ConsumptionEntry>) {
        self.checked = true;
        self.total_cost = Some(total_cost);
        self.purchase_log = purchase_log;
    }

    /// Write this sale's state back onto its inventory transaction.
    pub fn apply_to(&self, record: &mut TxRecord) {
        record.checked = self.checked;
        let props = &mut record.properties;
        if let Some(cost) = self.total_cost {
            props.set_decimal(keys::TOTAL_COST, cost);
        }
        if !self.purchase_log.is_empty() {
            props.set(
                keys::PURCHASE_LOG,
                ConsumptionEntry::log_to_json(&self.purchase_log),
            );
        }
    }
}

impl FifoOrdered for SaleRecord {
    fn fifo_key(&self) -> FifoKey {
        FifoKey::new(self.date, self.order, self.created_at)
    }
}

/// A return posted against a specific purchase lot after the fact.
///
/// Credit notes are applied before FIFO matching begins: each one splits
/// its lot, carving the returned quantity into a checked child so the
/// matcher only ever sees post-credit-note quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditNote {
    /// Id of the backing inventory transaction.
    pub tx_id: String,
    /// Purchase code of the lot this note reduces.
    pub purchase_code: String,
    /// Note date.
    pub date: NaiveDate,
    /// Quantity returned.
    pub quantity: Decimal,
    /// True once the note has been applied.
    pub checked: bool,
}

impl CreditNote {
    /// Lift a classified inventory transaction into a credit note.
    #[must_use]
    pub fn from_record(record: &TxRecord) -> Self {
        Self {
            tx_id: record.id.clone(),
            purchase_code: record
                .properties
                .get(keys::PURCHASE_CODE)
                .unwrap_or(record.id.as_str())
                .to_string(),
            date: record.date,
            quantity: record.amount,
            checked: record.checked,
        }
    }
}
