//! Transaction query expressions.

use chrono::NaiveDate;
use lotledger_core::TxRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A transaction query: an account name plus optional date bounds.
///
/// Both bounds are inclusive. By default checked records are excluded
/// (the matcher only wants unresolved work); the reset engine opts back
/// in with [`with_checked`](Self::with_checked). Trashed records are
/// never returned.
///
/// The [`Display`](fmt::Display) form is the platform query expression
/// (`account:'Name' after:2024-01-01 before:2024-03-01`), used by remote
/// adapters and tracing output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxQuery {
    /// Account name, matched against either side of a transaction.
    pub account: String,
    /// Inclusive lower date bound.
    pub after: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub before: Option<NaiveDate>,
    /// Include records already marked checked.
    pub include_checked: bool,
}

impl TxQuery {
    /// Query all unchecked transactions touching an account.
    #[must_use]
    pub fn on_account(name: impl Into<String>) -> Self {
        Self {
            account: name.into(),
            after: None,
            before: None,
            include_checked: false,
        }
    }

    /// Set the inclusive lower date bound.
    #[must_use]
    pub const fn with_after(mut self, date: NaiveDate) -> Self {
        self.after = Some(date);
        self
    }

    /// Set the inclusive upper date bound.
    #[must_use]
    pub const fn with_before(mut self, date: NaiveDate) -> Self {
        self.before = Some(date);
        self
    }

    /// Include checked records in the result.
    #[must_use]
    pub const fn with_checked(mut self) -> Self {
        self.include_checked = true;
        self
    }

    /// Whether a record satisfies this query.
    #[must_use]
    pub fn matches(&self, record: &TxRecord) -> bool {
        if record.trashed {
            return false;
        }
        if !self.include_checked && record.checked {
            return false;
        }
        if record.debit.name != self.account && record.credit.name != self.account {
            return false;
        }
        if let Some(after) = self.after {
            if record.date < after {
                return false;
            }
        }
        if let Some(before) = self.before {
            if record.date > before {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for TxQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "account:'{}'", self.account)?;
        if let Some(after) = self.after {
            write!(f, " after:{after}")?;
        }
        if let Some(before) = self.before {
            write!(f, " before:{before}")?;
        }
        if self.include_checked {
            write!(f, " checked:true")?;
        }
        Ok(())
    }
}
