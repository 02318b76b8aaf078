//! FIFO cost-of-sales matching and reconciliation engine.
//!
//! For one inventory-tracked good, the engine collects unresolved
//! purchase and sale records, matches them in FIFO order (splitting
//! partially consumed lots), folds in out-of-band additional costs and
//! credit notes found by a time-windowed search, and emits synthesized
//! COGS postings into the financial ledger. A full reset reverses all
//! synthesized state so recomputation can restart from source data.
//!
//! One pass runs in three phases over a [`LedgerService`]: read and
//! classify, compute and stage, commit. All mutation is deferred to a
//! single batched commit, so validation failures, lock conflicts and
//! cancellation never leave partial writes; invocations for different
//! accounts are independent, while callers must serialize invocations
//! for the *same* account.
//!
//! # Example
//!
//! ```no_run
//! use lotledger_engine::CostEngine;
//! use lotledger_service::{BookPair, MemoryLedger};
//!
//! let mut ledger = MemoryLedger::new();
//! # ledger.add_book("financial", 2);
//! # ledger.add_book("inventory", 2);
//! let books = BookPair::new("financial", "inventory");
//!
//! let mut engine = CostEngine::new(&mut ledger, books);
//! let summary = engine.calculate_cost_of_sales("account_id", None)?;
//! println!("{summary}");
//! # Ok::<(), lotledger_engine::EngineError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod buffer;
pub mod classify;
pub mod config;
pub mod credit_note;
pub mod error;
pub mod matcher;
pub mod resolve;
pub mod reset;
#[cfg(test)]
mod testutil;

pub use buffer::{CommitReceipt, MutationBuffer, TempIds};
pub use classify::{classify_account, ClassifiedAccount};
pub use config::Config;
pub use credit_note::apply_credit_notes;
pub use error::{EngineError, Violation};
pub use matcher::{match_sales, MatchOutcome, MatchParams};
pub use resolve::{resolve_adjustments, CostAdjustments};
pub use reset::stage_reset;

use chrono::{Days, Local, NaiveDate};
use lotledger_core::{Account, Summary, TrackedGood};
use lotledger_service::{BookPair, LedgerService};
use tracing::info;

/// The engine's two entry points over one pair of books.
///
/// Delivery mechanisms (CLI, webhook handler, scheduled job) construct
/// one `CostEngine` per invocation and call
/// [`calculate_cost_of_sales`](Self::calculate_cost_of_sales) or
/// [`reset_cost_of_sales`](Self::reset_cost_of_sales); both are
/// idempotent given identical ledger state.
#[derive(Debug)]
pub struct CostEngine<'a, S: LedgerService> {
    service: &'a mut S,
    books: BookPair,
    config: Config,
}

impl<'a, S: LedgerService> CostEngine<'a, S> {
    /// Create an engine with the default configuration.
    pub fn new(service: &'a mut S, books: BookPair) -> Self {
        Self {
            service,
            books,
            config: Config::default(),
        }
    }

    /// Override the configuration.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Compute cost of goods sold for one tracked good.
    ///
    /// `as_of` bounds the sales considered; it defaults to today. An
    /// account flagged for rebuild is reset instead (never both in one
    /// invocation) and the rebuild-triggered summary is returned.
    ///
    /// Invariant violations and lock conflicts come back as error
    /// summaries with nothing mutated; only service failures are `Err`.
    pub fn calculate_cost_of_sales(
        &mut self,
        account_id: &str,
        as_of: Option<NaiveDate>,
    ) -> Result<Summary, EngineError> {
        let mut account = self.service.get_account(&self.books.inventory, account_id)?;
        let mut good = TrackedGood::from_account(&account);

        if good.needs_rebuild {
            info!(account = %account_id, "account flagged for rebuild; reseting instead");
            let summary = self.run_reset(&mut account, &mut good)?;
            if summary.error {
                return Ok(summary);
            }
            return Ok(Summary::rebuild_triggered(account_id));
        }

        let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
        let until = as_of.checked_add_days(Days::new(1)).unwrap_or(as_of);

        let mut classified =
            classify_account(&*self.service, &self.books.inventory, &good.name, until)?;
        if classified.sales.is_empty() {
            return Ok(Summary::nothing_to_calculate(account_id));
        }
        if let Err(violation) = classified.check_quantities() {
            return Ok(violation_summary(account_id, violation));
        }

        let inventory_digits = self.service.fraction_digits(&self.books.inventory)?;
        let financial_digits = self.service.fraction_digits(&self.books.financial)?;

        let mut buffer = MutationBuffer::new(self.config.agent_id.clone());
        let mut temp_ids = TempIds::new();

        if let Err(violation) =
            apply_credit_notes(&mut classified, &mut buffer, &mut temp_ids)
        {
            return Ok(violation_summary(account_id, violation));
        }

        let params = MatchParams {
            config: &self.config,
            good_name: &good.name,
            inventory_digits,
            financial_digits,
        };
        let outcome = match_sales(
            &*self.service,
            &self.books,
            params,
            &mut classified,
            &mut buffer,
            &mut temp_ids,
        )?;

        if buffer.has_locked() {
            return Ok(Summary::locked_error(account_id));
        }
        buffer.commit(self.service, &self.books)?;

        good.last_calc_date = Some(as_of);
        good.apply_to(&mut account);
        self.service
            .update_account(&self.books.inventory, &account)?;

        info!(
            account = %account_id,
            matched = outcome.matched,
            unmatched = outcome.unmatched,
            "cost of sales calculated"
        );
        Ok(Summary::calculated(account_id, outcome.unmatched))
    }

    /// Reverse everything a previous calculation synthesized for one
    /// tracked good, restoring its pre-calculation state.
    pub fn reset_cost_of_sales(&mut self, account_id: &str) -> Result<Summary, EngineError> {
        let mut account = self.service.get_account(&self.books.inventory, account_id)?;
        let mut good = TrackedGood::from_account(&account);
        self.run_reset(&mut account, &mut good)
    }

    fn run_reset(
        &mut self,
        account: &mut Account,
        good: &mut TrackedGood,
    ) -> Result<Summary, EngineError> {
        let mut buffer = MutationBuffer::new(self.config.agent_id.clone());
        let touched = stage_reset(
            &*self.service,
            &self.books,
            &self.config,
            &good.name,
            &mut buffer,
        )?;

        if buffer.has_locked() {
            return Ok(Summary::locked_error(good.account_id.as_str()));
        }
        buffer.commit(self.service, &self.books)?;

        good.needs_rebuild = false;
        good.last_calc_date = None;
        good.apply_to(account);
        self.service
            .update_account(&self.books.inventory, account)?;

        info!(account = %good.account_id, touched, "reset complete");
        Ok(Summary::reseted(good.account_id.as_str()))
    }
}

fn violation_summary(account_id: &str, violation: Violation) -> Summary {
    match violation {
        Violation::SalesExceedPurchases => Summary::quantity_error(account_id),
        Violation::CreditNoteExceedsLot => Summary::credit_note_error(account_id),
    }
}
