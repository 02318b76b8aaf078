//! Custom key/value properties carried by ledger records.
//!
//! The ledger platform stores arbitrary string tags on transactions and
//! accounts. The engine only ever reads and writes a fixed set of keys
//! (see [`keys`]); everything else is passed through untouched. Typed
//! accessors parse decimals, dates and integers on the way out, so the
//! rest of the codebase never handles raw strings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Property keys written and read by the engine.
///
/// Purchase lots, their additional costs and their credit notes are
/// correlated through [`PURCHASE_CODE`](keys::PURCHASE_CODE); everything
/// else is bookkeeping the engine needs to split lots reversibly.
pub mod keys {
    /// Correlation key shared by a purchase, its additional costs and its
    /// credit notes.
    pub const PURCHASE_CODE: &str = "purchase_code";
    /// Invoice number of the posting itself. Differs from the purchase
    /// code on additional-cost postings.
    pub const PURCHASE_INVOICE: &str = "purchase_invoice";
    /// Marker identifying a credit note.
    pub const CREDIT_NOTE: &str = "credit_note";
    /// Quantity a lot held before its first split.
    pub const ORIGINAL_QUANTITY: &str = "original_quantity";
    /// Cost a lot carried before adjustment or splitting.
    pub const ORIGINAL_AMOUNT: &str = "original_amount";
    /// Id of the lot a split child was carved out of.
    pub const PARENT_ID: &str = "parent_id";
    /// Explicit FIFO tie-break, ascending; absent means 0.
    pub const ORDER: &str = "order";
    /// Total cost of a matched sale.
    pub const TOTAL_COST: &str = "total_cost";
    /// Aggregated additional costs folded into a lot.
    pub const ADD_COSTS: &str = "add_costs";
    /// Aggregated credit-note amount folded into a lot.
    pub const CREDIT_AMOUNT: &str = "credit_amount";
    /// JSON consumption log written on a matched sale.
    pub const PURCHASE_LOG: &str = "purchase_log";
    /// JSON consumption log written on a consumed lot.
    pub const LIQUIDATION_LOG: &str = "liquidation_log";
    /// Quantity sold, stamped on a synthesized COGS posting.
    pub const QUANTITY_SOLD: &str = "quantity_sold";
    /// Sale invoice reference, stamped on a synthesized COGS posting.
    pub const SALE_INVOICE: &str = "sale_invoice";
    /// Rebuild flag on a tracked good's account.
    pub const NEEDS_REBUILD: &str = "needs_rebuild";
    /// Date of the last successful calculation, on a tracked good's account.
    pub const LAST_CALC_DATE: &str = "last_calc_date";
    /// Exchange/currency code surfaced on a tracked good's account.
    pub const EXC_CODE: &str = "exc_code";
}

/// An ordered bag of string properties.
///
/// Backed by a `BTreeMap` so serialization and iteration are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    /// Create an empty property bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a property value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Check whether a key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a property value, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove a property, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Builder-style variant of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Parse a property as a decimal.
    ///
    /// Unparseable values are treated as absent.
    #[must_use]
    pub fn get_decimal(&self, key: &str) -> Option<Decimal> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Parse a property as an ISO date (`YYYY-MM-DD`).
    #[must_use]
    pub fn get_date(&self, key: &str) -> Option<NaiveDate> {
        self.get(key)
            .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
    }

    /// Parse a property as an integer.
    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    /// Parse a property as a boolean. Only the literal `"true"` is true.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }

    /// Set a decimal property.
    pub fn set_decimal(&mut self, key: impl Into<String>, value: Decimal) {
        self.set(key, value.to_string());
    }

    /// Set a date property in ISO format.
    pub fn set_date(&mut self, key: impl Into<String>, value: NaiveDate) {
        self.set(key, value.format("%Y-%m-%d").to_string());
    }

    /// Iterate over all key/value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Check if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_set_get() {
        let mut props = Properties::new();
        props.set(keys::PURCHASE_CODE, "INV-001");

        assert_eq!(props.get(keys::PURCHASE_CODE), Some("INV-001"));
        assert!(props.contains(keys::PURCHASE_CODE));
        assert_eq!(props.get("missing"), None);
    }

    #[test]
    fn test_get_decimal() {
        let props = Properties::new().with(keys::TOTAL_COST, "123.45");
        assert_eq!(props.get_decimal(keys::TOTAL_COST), Some(dec!(123.45)));

        let bad = Properties::new().with(keys::TOTAL_COST, "not-a-number");
        assert_eq!(bad.get_decimal(keys::TOTAL_COST), None);
    }

    #[test]
    fn test_get_date_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut props = Properties::new();
        props.set_date(keys::LAST_CALC_DATE, date);

        assert_eq!(props.get(keys::LAST_CALC_DATE), Some("2024-03-01"));
        assert_eq!(props.get_date(keys::LAST_CALC_DATE), Some(date));
    }

    #[test]
    fn test_get_bool() {
        let props = Properties::new().with(keys::NEEDS_REBUILD, "true");
        assert!(props.get_bool(keys::NEEDS_REBUILD));

        let props = Properties::new().with(keys::NEEDS_REBUILD, "yes");
        assert!(!props.get_bool(keys::NEEDS_REBUILD));

        assert!(!Properties::new().get_bool(keys::NEEDS_REBUILD));
    }

    #[test]
    fn test_remove() {
        let mut props = Properties::new().with(keys::ORDER, "3");
        assert_eq!(props.remove(keys::ORDER), Some("3".to_string()));
        assert!(!props.contains(keys::ORDER));
    }
}
