//! Purchase lots.
//!
//! A [`Lot`] is a purchase record in the inventory ledger, consumed in
//! FIFO order by sales. A lot is either fully unconsumed (unchecked, full
//! quantity), fully consumed (checked), or partially consumed. In the
//! partial case a checked child lot is materialized holding the consumed
//! quantity while the parent keeps the remainder. The parent's pre-split quantity
//! and cost are preserved so a reset can restore them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{keys, ConsumptionEntry, FifoKey, FifoOrdered, TxRecord};

/// A purchase lot for one tracked good.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    /// Id of the backing inventory transaction.
    pub tx_id: String,
    /// Correlation key shared with additional costs and credit notes.
    pub purchase_code: String,
    /// Purchase date.
    pub date: NaiveDate,
    /// Quantity still recorded on this lot.
    pub quantity: Decimal,
    /// Total cost of the recorded quantity.
    pub cost: Decimal,
    /// Quantity before the first split, if the lot has been split.
    pub original_quantity: Option<Decimal>,
    /// Cost before the first adjustment or split.
    pub original_cost: Option<Decimal>,
    /// True once the lot is fully consumed.
    pub checked: bool,
    /// Set on split children: the lot this was carved out of.
    pub parent_id: Option<String>,
    /// Explicit FIFO tie-break.
    pub order: i64,
    /// Ledger creation timestamp, epoch milliseconds.
    pub created_at: i64,
    /// Aggregated additional costs, once resolved.
    pub additional_costs: Option<Decimal>,
    /// Aggregated credit-note amount, once resolved.
    pub credit_note_total: Option<Decimal>,
    /// Consumption entries recorded against this lot.
    pub liquidation_log: Vec<ConsumptionEntry>,
}

/// The arithmetic outcome of partially consuming a lot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotSplit {
    /// Quantity taken by the sale.
    pub consumed: Decimal,
    /// Cost of the consumed quantity at the lot's unit cost.
    pub consumed_cost: Decimal,
    /// Quantity left on the parent lot.
    pub remainder: Decimal,
    /// Cost left on the parent lot.
    pub remainder_cost: Decimal,
}

impl Lot {
    /// Create a lot with zero quantity and cost.
    #[must_use]
    pub fn new(
        tx_id: impl Into<String>,
        purchase_code: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            tx_id: tx_id.into(),
            purchase_code: purchase_code.into(),
            date,
            quantity: Decimal::ZERO,
            cost: Decimal::ZERO,
            original_quantity: None,
            original_cost: None,
            checked: false,
            parent_id: None,
            order: 0,
            created_at: 0,
            additional_costs: None,
            credit_note_total: None,
            liquidation_log: Vec::new(),
        }
    }

    /// Set the quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the total cost.
    #[must_use]
    pub const fn with_cost(mut self, cost: Decimal) -> Self {
        self.cost = cost;
        self
    }

    /// Set the explicit FIFO order.
    #[must_use]
    pub const fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// Set the creation timestamp.
    #[must_use]
    pub const fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = created_at;
        self
    }

    /// Lift a classified inventory transaction into a lot.
    ///
    /// The quantity is the transaction amount; the cost is read from the
    /// `total_cost` property. A purchase without an explicit purchase
    /// code is keyed by its own transaction id, which correlates no
    /// additional costs to it.
    #[must_use]
    pub fn from_record(record: &TxRecord) -> Self {
        let props = &record.properties;
        Self {
            tx_id: record.id.clone(),
            purchase_code: props
                .get(keys::PURCHASE_CODE)
                .unwrap_or(record.id.as_str())
                .to_string(),
            date: record.date,
            quantity: record.amount,
            cost: props.get_decimal(keys::TOTAL_COST).unwrap_or(Decimal::ZERO),
            original_quantity: props.get_decimal(keys::ORIGINAL_QUANTITY),
            original_cost: props.get_decimal(keys::ORIGINAL_AMOUNT),
            checked: record.checked,
            parent_id: props.get(keys::PARENT_ID).map(ToString::to_string),
            order: record.order(),
            created_at: record.created_at,
            additional_costs: props.get_decimal(keys::ADD_COSTS),
            credit_note_total: props.get_decimal(keys::CREDIT_AMOUNT),
            liquidation_log: props
                .get(keys::LIQUIDATION_LOG)
                .map(ConsumptionEntry::log_from_json)
                .unwrap_or_default(),
        }
    }

    /// Whether cost adjustments have already been folded into this lot.
    ///
    /// Guards the resolver against double counting on repeated passes.
    #[must_use]
    pub const fn is_adjusted(&self) -> bool {
        self.additional_costs.is_some() || self.credit_note_total.is_some()
    }

    /// Fold resolved additional costs and credit notes into the cost.
    ///
    /// Records the pre-adjustment cost so a reset can restore it. Zero
    /// adjustments leave no marker, so the resolver may run again on a
    /// later pass; it returns the same zeros and the fold is a no-op.
    pub fn apply_adjustments(&mut self, additional_costs: Decimal, credit_amount: Decimal) {
        if additional_costs.is_zero() && credit_amount.is_zero() {
            return;
        }
        self.record_original();
        self.cost = self.cost + additional_costs - credit_amount;
        if !additional_costs.is_zero() {
            self.additional_costs = Some(additional_costs);
        }
        if !credit_amount.is_zero() {
            self.credit_note_total = Some(credit_amount);
        }
    }

    /// Per-unit cost of the recorded quantity.
    ///
    /// Callers must not invoke this on an empty lot.
    #[must_use]
    pub fn unit_cost(&self) -> Decimal {
        self.cost / self.quantity
    }

    /// Compute the cost arithmetic for consuming part of this lot.
    ///
    /// The remainder cost is the difference rather than a second
    /// multiplication, so the two portions always sum to the lot's cost
    /// exactly.
    #[must_use]
    pub fn split(&self, consumed: Decimal) -> LotSplit {
        let consumed_cost = consumed * self.unit_cost();
        LotSplit {
            consumed,
            consumed_cost,
            remainder: self.quantity - consumed,
            remainder_cost: self.cost - consumed_cost,
        }
    }

    /// Preserve the current quantity and cost before the first mutation.
    pub fn record_original(&mut self) {
        if self.original_quantity.is_none() {
            self.original_quantity = Some(self.quantity);
        }
        if self.original_cost.is_none() {
            self.original_cost = Some(self.cost);
        }
    }

    /// Mark the whole lot consumed by a sale.
    ///
    /// Preserves the pre-consumption quantity and cost so a reset can
    /// restore the lot even when it was never split or adjusted.
    pub fn consume_fully(&mut self, entry: ConsumptionEntry) {
        self.record_original();
        self.checked = true;
        self.liquidation_log.push(entry);
    }

    /// Write this lot's state back onto its inventory transaction.
    pub fn apply_to(&self, record: &mut TxRecord) {
        record.amount = self.quantity;
        record.checked = self.checked;
        let props = &mut record.properties;
        props.set(keys::PURCHASE_CODE, self.purchase_code.clone());
        if let Some(q) = self.original_quantity {
            props.set_decimal(keys::ORIGINAL_QUANTITY, q);
        }
        if let Some(c) = self.original_cost {
            props.set_decimal(keys::ORIGINAL_AMOUNT, c);
        }
        props.set_decimal(keys::TOTAL_COST, self.cost);
        if let Some(a) = self.additional_costs {
            props.set_decimal(keys::ADD_COSTS, a);
        }
        if let Some(c) = self.credit_note_total {
            props.set_decimal(keys::CREDIT_AMOUNT, c);
        }
        if let Some(parent) = &self.parent_id {
            props.set(keys::PARENT_ID, parent.clone());
        }
        if !self.liquidation_log.is_empty() {
            props.set(
                keys::LIQUIDATION_LOG,
                ConsumptionEntry::log_to_json(&self.liquidation_log),
            );
        }
    }
}

impl FifoOrdered for Lot {
    fn fifo_key(&self) -> FifoKey {
        FifoKey::new(self.date, self.order, self.created_at)
    }
}
