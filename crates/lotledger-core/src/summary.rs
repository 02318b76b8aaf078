//! Per-invocation result summaries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome of one engine invocation for one account.
///
/// Data-invariant violations and lock conflicts are reported here rather
/// than as hard errors: no mutation was performed and the caller may
/// present the message to an operator or retry later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// The inventory account this invocation ran for.
    pub account_id: String,
    /// Human-readable outcome message.
    pub message: String,
    /// True when the pass aborted without mutating anything.
    pub error: bool,
}

impl Summary {
    fn ok(account_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            message: message.into(),
            error: false,
        }
    }

    fn err(account_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            message: message.into(),
            error: true,
        }
    }

    /// Matching completed and all staged mutations were committed.
    ///
    /// `unmatched` counts sales left unmatched by a concurrent-edit race;
    /// zero for a clean pass.
    #[must_use]
    pub fn calculated(account_id: impl Into<String>, unmatched: usize) -> Self {
        if unmatched == 0 {
            Self::ok(account_id, "Calculated")
        } else {
            Self::ok(
                account_id,
                format!("Calculated ({unmatched} sale(s) left unmatched)"),
            )
        }
    }

    /// A reset completed and all synthesized state was reversed.
    #[must_use]
    pub fn reseted(account_id: impl Into<String>) -> Self {
        Self::ok(account_id, "Reseted")
    }

    /// The account was flagged for rebuild; a reset ran instead of a
    /// calculation.
    #[must_use]
    pub fn rebuild_triggered(account_id: impl Into<String>) -> Self {
        Self::ok(account_id, "Account needs rebuild: reseting...")
    }

    /// No unmatched sales were found.
    #[must_use]
    pub fn nothing_to_calculate(account_id: impl Into<String>) -> Self {
        Self::ok(account_id, "Nothing to calculate")
    }

    /// Aggregate sold quantity exceeds aggregate purchased quantity.
    #[must_use]
    pub fn quantity_error(account_id: impl Into<String>) -> Self {
        Self::err(
            account_id,
            "Cannot proceed: sales quantity is greater than quantity purchased",
        )
    }

    /// A credit note exceeds what remains in its lot.
    #[must_use]
    pub fn credit_note_error(account_id: impl Into<String>) -> Self {
        Self::err(
            account_id,
            "Cannot proceed: credit note quantity is greater than quantity purchased",
        )
    }

    /// A touched record was administratively locked.
    #[must_use]
    pub fn locked_error(account_id: impl Into<String>) -> Self {
        Self::err(
            account_id,
            "Cannot proceed: collection has locked/closed book(s)",
        )
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.error {
            write!(f, "error [{}]: {}", self.account_id, self.message)
        } else {
            write!(f, "[{}] {}", self.account_id, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculated_clean() {
        let summary = Summary::calculated("a1", 0);
        assert_eq!(summary.message, "Calculated");
        assert!(!summary.error);
    }

    #[test]
    fn test_calculated_with_unmatched() {
        let summary = Summary::calculated("a1", 2);
        assert_eq!(summary.message, "Calculated (2 sale(s) left unmatched)");
        assert!(!summary.error);
    }

    #[test]
    fn test_error_summaries() {
        assert!(Summary::quantity_error("a1").error);
        assert!(Summary::credit_note_error("a1").error);
        assert!(Summary::locked_error("a1").error);
        assert!(!Summary::rebuild_triggered("a1").error);
    }

    #[test]
    fn test_display() {
        let summary = Summary::locked_error("a1");
        assert_eq!(
            summary.to_string(),
            "error [a1]: Cannot proceed: collection has locked/closed book(s)"
        );
    }
}
