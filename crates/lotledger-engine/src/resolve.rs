//! Additional-cost and credit-note resolution.
//!
//! Additional costs (freight, duties) and financial credit notes are not
//! linked to their purchase by reference; they share its purchase code
//! and sit somewhere near it in time. Resolution searches a bounded
//! window around the purchase date in the financial ledger and sums the
//! two categories independently.

use chrono::Months;
use lotledger_core::{keys, Decimal, Lot, NaiveDate};
use lotledger_service::{BookId, LedgerService, ServiceError, TxQuery};
use tracing::debug;

/// Aggregated out-of-band cost adjustments for one purchase lot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CostAdjustments {
    /// Sum of additional costs to fold into the lot.
    pub additional_costs: Decimal,
    /// Sum of credit-note amounts to subtract from the lot.
    pub credit_notes: Decimal,
}

fn window_start(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

fn window_end(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Resolve the cost adjustments for `lot` against the financial book.
///
/// A checked posting counts as an additional cost when it debits the
/// good's counterpart account, shares the lot's purchase code, and
/// carries an invoice number different from that code (the original
/// purchase posting's invoice *is* the code). It counts as a credit note
/// when it is checked, credits the counterpart account, shares the code
/// and carries the credit-note marker.
///
/// Resolution is read-only and idempotent; callers skip it for lots that
/// already carry adjustment markers so repeated passes never double
/// count.
pub fn resolve_adjustments<S: LedgerService>(
    service: &S,
    financial: &BookId,
    counterpart: &str,
    lot: &Lot,
    window_months: u32,
) -> Result<CostAdjustments, ServiceError> {
    let query = TxQuery::on_account(counterpart)
        .with_after(window_start(lot.date, window_months))
        .with_before(window_end(lot.date, window_months))
        .with_checked();

    let mut adjustments = CostAdjustments::default();
    for record in service.query_transactions(financial, &query)? {
        if !record.checked {
            continue;
        }
        if record.properties.get(keys::PURCHASE_CODE) != Some(lot.purchase_code.as_str()) {
            continue;
        }
        if record.properties.contains(keys::CREDIT_NOTE) {
            if record.credit.name == counterpart {
                adjustments.credit_notes += record.amount;
            }
        } else if record.debit.name == counterpart
            && record
                .properties
                .get(keys::PURCHASE_INVOICE)
                .is_some_and(|invoice| invoice != lot.purchase_code)
        {
            adjustments.additional_costs += record.amount;
        }
    }

    if adjustments != CostAdjustments::default() {
        debug!(
            purchase_code = %lot.purchase_code,
            additional_costs = %adjustments.additional_costs,
            credit_notes = %adjustments.credit_notes,
            "resolved cost adjustments"
        );
    }
    Ok(adjustments)
}
