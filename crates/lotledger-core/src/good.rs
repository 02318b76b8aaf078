//! Tracked goods.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{keys, Account};

/// An inventory-ledger account representing one fungible good.
///
/// Created and owned externally; the engine persists exactly two pieces
/// of state on it across invocations: the rebuild flag and the last
/// calculation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedGood {
    /// Inventory account id.
    pub account_id: String,
    /// Account name; also names the financial counterpart account.
    pub name: String,
    /// True when prior calculation state is stale and must be reset
    /// before recomputation.
    pub needs_rebuild: bool,
    /// Date of the last successful calculation.
    pub last_calc_date: Option<NaiveDate>,
    /// Exchange/currency code surfaced by the ledger for this good.
    pub currency: Option<String>,
}

impl TrackedGood {
    /// Read a tracked good from its inventory account.
    #[must_use]
    pub fn from_account(account: &Account) -> Self {
        let props = &account.properties;
        Self {
            account_id: account.id.clone(),
            name: account.name.clone(),
            needs_rebuild: props.get_bool(keys::NEEDS_REBUILD),
            last_calc_date: props.get_date(keys::LAST_CALC_DATE),
            currency: props.get(keys::EXC_CODE).map(ToString::to_string),
        }
    }

    /// Write the engine-owned flags back onto the account.
    pub fn apply_to(&self, account: &mut Account) {
        let props = &mut account.properties;
        if self.needs_rebuild {
            props.set(keys::NEEDS_REBUILD, "true");
        } else {
            props.remove(keys::NEEDS_REBUILD);
        }
        match self.last_calc_date {
            Some(date) => props.set_date(keys::LAST_CALC_DATE, date),
            None => {
                props.remove(keys::LAST_CALC_DATE);
            }
        }
    }
}
