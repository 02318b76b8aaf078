//! Ledger accounts and transactions as seen through the service boundary.
//!
//! A [`TxRecord`] is a transaction that already exists in a ledger; a
//! [`TxDraft`] is one the engine wants to create, identified by a locally
//! generated temporary id until the ledger assigns a real one. The two id
//! spaces are kept strictly apart: drafts carry a `temp_id`, records an
//! `id`, and the mutation buffer is the only place the mapping between
//! them is resolved.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Properties;

/// The ledger-native account type.
///
/// The classifier only cares about `Incoming` (suppliers) and `Outgoing`
/// (customers); tracked goods themselves live on `Asset` accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccountKind {
    /// Balance-sheet asset account (tracked goods, bank accounts).
    #[default]
    Asset,
    /// Balance-sheet liability account.
    Liability,
    /// Money/goods flowing in from outside (suppliers).
    Incoming,
    /// Money/goods flowing out (customers).
    Outgoing,
}

impl FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ASSET" => Ok(Self::Asset),
            "LIABILITY" => Ok(Self::Liability),
            "INCOMING" => Ok(Self::Incoming),
            "OUTGOING" => Ok(Self::Outgoing),
            _ => Err(format!("unknown account kind: {s}")),
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset => write!(f, "ASSET"),
            Self::Liability => write!(f, "LIABILITY"),
            Self::Incoming => write!(f, "INCOMING"),
            Self::Outgoing => write!(f, "OUTGOING"),
        }
    }
}

/// A lightweight reference to an account, embedded in transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRef {
    /// Ledger-assigned account id.
    pub id: String,
    /// Account display name, unique within a book.
    pub name: String,
    /// The account's ledger-native type.
    pub kind: AccountKind,
}

impl AccountRef {
    /// Create an account reference.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// A full account, as returned by account lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Ledger-assigned account id.
    pub id: String,
    /// Account display name, unique within a book.
    pub name: String,
    /// The account's ledger-native type.
    pub kind: AccountKind,
    /// Custom properties stored on the account.
    pub properties: Properties,
}

impl Account {
    /// Create an account with no properties.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            properties: Properties::new(),
        }
    }

    /// Attach properties to this account.
    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Make the lightweight reference form of this account.
    #[must_use]
    pub fn to_ref(&self) -> AccountRef {
        AccountRef::new(self.id.clone(), self.name.clone(), self.kind)
    }
}

/// A transaction that exists in a ledger.
///
/// `debit` is the account value flows to, `credit` the account it flows
/// from. `created_at` is the ledger's creation timestamp in epoch
/// milliseconds and serves as the last FIFO tie-break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRecord {
    /// Ledger-assigned transaction id.
    pub id: String,
    /// Transaction date in the book's time zone.
    pub date: NaiveDate,
    /// Amount: a quantity in the inventory book, money in the financial book.
    pub amount: Decimal,
    /// Account the value flows to.
    pub debit: AccountRef,
    /// Account the value flows from.
    pub credit: AccountRef,
    /// Free-text description.
    pub description: String,
    /// Custom properties.
    pub properties: Properties,
    /// Cross-references to records in other books.
    pub remote_ids: Vec<String>,
    /// Reconciled/finalized flag; the engine uses it as "already matched".
    pub checked: bool,
    /// Soft-deleted flag.
    pub trashed: bool,
    /// Administratively immutable (closed period). Touching a locked
    /// record aborts the whole pass.
    pub locked: bool,
    /// Creation timestamp, epoch milliseconds.
    pub created_at: i64,
    /// Id of the agent that last wrote this record, if any.
    pub agent_id: Option<String>,
}

impl TxRecord {
    /// Check whether any remote id matches.
    #[must_use]
    pub fn has_remote_id(&self, remote_id: &str) -> bool {
        self.remote_ids.iter().any(|r| r == remote_id)
    }

    /// The explicit FIFO order property, defaulting to 0 when absent.
    #[must_use]
    pub fn order(&self) -> i64 {
        self.properties.get_i64(crate::keys::ORDER).unwrap_or(0)
    }
}

/// A transaction staged for creation.
///
/// Drafts have no ledger id yet; the `temp_id` is a locally generated
/// correlation key resolved to a real id after batch creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxDraft {
    /// Locally generated correlation key, never sent as a ledger id.
    pub temp_id: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Amount.
    pub amount: Decimal,
    /// Name of the account the value flows to.
    pub debit: String,
    /// Name of the account the value flows from.
    pub credit: String,
    /// Free-text description.
    pub description: String,
    /// Custom properties.
    pub properties: Properties,
    /// Cross-references to records in other books.
    pub remote_ids: Vec<String>,
    /// Whether to create the record already checked.
    pub checked: bool,
    /// Agent stamp recorded on the created transaction.
    pub agent_id: Option<String>,
}

impl TxDraft {
    /// Create a draft moving `amount` from `credit` to `debit` on `date`.
    #[must_use]
    pub fn new(
        temp_id: impl Into<String>,
        date: NaiveDate,
        amount: Decimal,
        debit: impl Into<String>,
        credit: impl Into<String>,
    ) -> Self {
        Self {
            temp_id: temp_id.into(),
            date,
            amount,
            debit: debit.into(),
            credit: credit.into(),
            description: String::new(),
            properties: Properties::new(),
            remote_ids: Vec::new(),
            checked: false,
            agent_id: None,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach properties.
    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Add a remote-id cross-reference.
    #[must_use]
    pub fn with_remote_id(mut self, remote_id: impl Into<String>) -> Self {
        self.remote_ids.push(remote_id.into());
        self
    }

    /// Mark the draft as checked on creation.
    #[must_use]
    pub const fn checked(mut self) -> Self {
        self.checked = true;
        self
    }

    /// Stamp the creating agent's id.
    #[must_use]
    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_account_kind_roundtrip() {
        for kind in [
            AccountKind::Asset,
            AccountKind::Liability,
            AccountKind::Incoming,
            AccountKind::Outgoing,
        ] {
            assert_eq!(kind.to_string().parse::<AccountKind>().unwrap(), kind);
        }
        assert!("SOMETHING".parse::<AccountKind>().is_err());
    }

    #[test]
    fn test_draft_builder() {
        let draft = TxDraft::new("tmp-1", date(2024, 1, 15), dec!(40), "Good", "Supplier")
            .with_description("split of tx_9")
            .with_remote_id("tx_9")
            .checked();

        assert_eq!(draft.temp_id, "tmp-1");
        assert_eq!(draft.amount, dec!(40));
        assert!(draft.checked);
        assert_eq!(draft.remote_ids, vec!["tx_9".to_string()]);
    }

    #[test]
    fn test_record_order_default() {
        let record = TxRecord {
            id: "tx_1".into(),
            date: date(2024, 1, 15),
            amount: dec!(10),
            debit: AccountRef::new("a1", "Good", AccountKind::Asset),
            credit: AccountRef::new("a2", "Supplier", AccountKind::Incoming),
            description: String::new(),
            properties: Properties::new(),
            remote_ids: vec![],
            checked: false,
            trashed: false,
            locked: false,
            created_at: 0,
            agent_id: None,
        };
        assert_eq!(record.order(), 0);

        let mut with_order = record.clone();
        with_order.properties.set(crate::keys::ORDER, "7");
        assert_eq!(with_order.order(), 7);

        assert!(!record.has_remote_id("x"));
    }
}
