//! The FIFO matcher.
//!
//! Consumes sales against purchase lots in FIFO order, splitting lots on
//! partial consumption, folding resolved cost adjustments into each lot
//! the first time it is touched, and staging one synthesized COGS
//! posting per fully matched sale.

use lotledger_core::{
    keys, rounds_to_zero, sort_fifo, ConsumptionEntry, Decimal, Lot, LotSplit, SaleRecord, TxDraft,
};
use lotledger_service::{BookPair, LedgerService, ServiceError};
use tracing::{debug, warn};

use crate::buffer::{MutationBuffer, TempIds};
use crate::classify::ClassifiedAccount;
use crate::config::Config;
use crate::resolve::resolve_adjustments;

/// Inputs the matcher needs besides the classified records themselves.
#[derive(Debug, Clone, Copy)]
pub struct MatchParams<'a> {
    /// Engine configuration.
    pub config: &'a Config,
    /// The tracked good's account name (also its financial counterpart).
    pub good_name: &'a str,
    /// Fractional-digit precision of the inventory book.
    pub inventory_digits: u32,
    /// Fractional-digit precision of the financial book.
    pub financial_digits: u32,
}

/// How matching went, for the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Sales fully matched and staged.
    pub matched: usize,
    /// Sales left unmatched because unconsumed stock ran out mid-pass.
    pub unmatched: usize,
}

/// Match every classified sale against the classified lots, staging all
/// resulting mutations through the buffer.
///
/// Lots and sales are each sorted by the composite FIFO key before
/// matching. A sale whose remaining quantity rounds to zero at the
/// inventory book's precision is finalized and gets a COGS posting; one
/// that exhausts the lots first is left untouched and reported in the
/// outcome. The aggregate quantity check makes that possible only under
/// concurrent edits, so it is surfaced as a warning rather than an
/// error.
pub fn match_sales<S: LedgerService>(
    service: &S,
    books: &BookPair,
    params: MatchParams<'_>,
    classified: &mut ClassifiedAccount,
    buffer: &mut MutationBuffer,
    temp_ids: &mut TempIds,
) -> Result<MatchOutcome, ServiceError> {
    let mut lots: Vec<Lot> = std::mem::take(&mut classified.purchases)
        .into_values()
        .collect();
    sort_fifo(&mut lots);
    let mut sales: Vec<SaleRecord> = std::mem::take(&mut classified.sales);
    sort_fifo(&mut sales);

    let mut outcome = MatchOutcome::default();

    for sale in &mut sales {
        if lots.is_empty() {
            continue;
        }

        let mut remaining = sale.quantity;
        let mut accumulated = Decimal::ZERO;
        let mut log: Vec<ConsumptionEntry> = Vec::new();

        for lot in &mut lots {
            if remaining.is_zero() {
                break;
            }
            if lot.checked || lot.quantity.is_zero() {
                continue;
            }

            if !lot.is_adjusted() {
                let adjustments = resolve_adjustments(
                    service,
                    &books.financial,
                    params.good_name,
                    lot,
                    params.config.cost_window_months,
                )?;
                lot.apply_adjustments(adjustments.additional_costs, adjustments.credit_notes);
            }
            let unit_cost = lot.unit_cost();

            if remaining >= lot.quantity {
                // The whole lot goes to this sale.
                accumulated += lot.cost;
                remaining -= lot.quantity;
                log.push(ConsumptionEntry::new(
                    lot.tx_id.clone(),
                    lot.quantity,
                    unit_cost,
                    sale.date,
                ));
                lot.consume_fully(ConsumptionEntry::new(
                    sale.tx_id.clone(),
                    lot.quantity,
                    unit_cost,
                    sale.date,
                ));
                stage_lot(classified, buffer, lot);
            } else {
                // Partial consumption: carve the consumed quantity into a
                // checked child lot, leave the remainder on the parent.
                let split = lot.split(remaining);
                lot.record_original();
                stage_split_child(classified, buffer, temp_ids, lot, &split, sale, unit_cost);

                lot.quantity = split.remainder;
                lot.cost = split.remainder_cost;
                accumulated += split.consumed_cost;
                log.push(ConsumptionEntry::new(
                    lot.tx_id.clone(),
                    split.consumed,
                    unit_cost,
                    sale.date,
                ));
                remaining = Decimal::ZERO;
                stage_lot(classified, buffer, lot);
            }
        }

        if rounds_to_zero(remaining, params.inventory_digits) {
            if log.is_empty() {
                continue;
            }
            debug!(sale = %sale.tx_id, cost = %accumulated, "sale matched");
            sale.finalize(accumulated, log);
            if let Some(record) = classified.records.get_mut(&sale.tx_id) {
                sale.apply_to(record);
                buffer.stage_inventory_update(record.clone());
            }
            stage_cogs_posting(params, buffer, temp_ids, sale, accumulated);
            outcome.matched += 1;
        } else {
            warn!(
                sale = %sale.tx_id,
                remaining = %remaining,
                "sale left unmatched: unconsumed stock ran out mid-pass"
            );
            outcome.unmatched += 1;
        }
    }

    Ok(outcome)
}

fn stage_lot(classified: &mut ClassifiedAccount, buffer: &mut MutationBuffer, lot: &Lot) {
    if let Some(record) = classified.records.get_mut(&lot.tx_id) {
        lot.apply_to(record);
        buffer.stage_inventory_update(record.clone());
    }
}

fn stage_split_child(
    classified: &ClassifiedAccount,
    buffer: &mut MutationBuffer,
    temp_ids: &mut TempIds,
    lot: &Lot,
    split: &LotSplit,
    sale: &SaleRecord,
    unit_cost: Decimal,
) {
    let Some(parent) = classified.records.get(&lot.tx_id) else {
        return;
    };
    let mut child = TxDraft::new(
        temp_ids.next_id(),
        lot.date,
        split.consumed,
        parent.debit.name.clone(),
        parent.credit.name.clone(),
    )
    .with_description(parent.description.clone())
    .checked();
    child.properties.set(keys::PURCHASE_CODE, lot.purchase_code.clone());
    child.properties.set(keys::PARENT_ID, lot.tx_id.clone());
    child
        .properties
        .set_decimal(keys::TOTAL_COST, split.consumed_cost);
    child.properties.set(
        keys::LIQUIDATION_LOG,
        ConsumptionEntry::log_to_json(&[ConsumptionEntry::new(
            sale.tx_id.clone(),
            split.consumed,
            unit_cost,
            sale.date,
        )]),
    );
    buffer.stage_inventory_create(child);
}

fn stage_cogs_posting(
    params: MatchParams<'_>,
    buffer: &mut MutationBuffer,
    temp_ids: &mut TempIds,
    sale: &SaleRecord,
    accumulated: Decimal,
) {
    let description = match &sale.invoice {
        Some(invoice) => format!("Cost of sale - {invoice}"),
        None => "Cost of sale".to_string(),
    };
    let mut posting = TxDraft::new(
        temp_ids.next_id(),
        sale.date,
        accumulated.round_dp(params.financial_digits),
        params.config.cogs_account_name.clone(),
        params.good_name.to_string(),
    )
    .with_description(description)
    .with_remote_id(sale.tx_id.clone())
    .checked();
    posting
        .properties
        .set_decimal(keys::QUANTITY_SOLD, sale.quantity);
    if let Some(invoice) = &sale.invoice {
        posting.properties.set(keys::SALE_INVOICE, invoice.clone());
    }
    buffer.stage_financial_create(posting);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify_account;
    use crate::testutil::{purchase_tx, sale_tx, seed_books, FINANCIAL, INVENTORY};
    use chrono::NaiveDate;
    use lotledger_service::{BookId, MemoryLedger};
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn books() -> BookPair {
        BookPair::new(FINANCIAL, INVENTORY)
    }

    fn run_matcher(
        ledger: &MemoryLedger,
        config: &Config,
    ) -> (ClassifiedAccount, MutationBuffer, MatchOutcome) {
        let inventory = BookId::new(INVENTORY);
        let mut classified =
            classify_account(ledger, &inventory, "Widgets", date(2024, 12, 31)).unwrap();
        let mut buffer = MutationBuffer::new(config.agent_id.clone());
        let mut temp_ids = TempIds::new();
        let params = MatchParams {
            config,
            good_name: "Widgets",
            inventory_digits: 2,
            financial_digits: 2,
        };
        let outcome = match_sales(
            ledger,
            &books(),
            params,
            &mut classified,
            &mut buffer,
            &mut temp_ids,
        )
        .unwrap();
        (classified, buffer, outcome)
    }

    #[test]
    fn test_exact_consumption_checks_lot() {
        let mut ledger = seed_books();
        let inventory = BookId::new(INVENTORY);
        ledger
            .add_transaction(
                &inventory,
                purchase_tx("p1", "INV-1", date(2024, 1, 1), dec!(10), dec!(100)),
            )
            .unwrap();
        ledger
            .add_transaction(&inventory, sale_tx("s1", date(2024, 1, 10), dec!(10)))
            .unwrap();

        let (classified, _, outcome) = run_matcher(&ledger, &Config::default());

        assert_eq!(outcome, MatchOutcome { matched: 1, unmatched: 0 });
        let lot_record = &classified.records["p1"];
        assert!(lot_record.checked);
        let sale_record = &classified.records["s1"];
        assert!(sale_record.checked);
        assert_eq!(
            sale_record.properties.get_decimal(keys::TOTAL_COST),
            Some(dec!(100))
        );
    }

    #[test]
    fn test_fifo_order_across_lots() {
        let mut ledger = seed_books();
        let inventory = BookId::new(INVENTORY);
        ledger
            .add_transaction(
                &inventory,
                purchase_tx("p2", "INV-2", date(2024, 2, 1), dec!(10), dec!(200)),
            )
            .unwrap();
        ledger
            .add_transaction(
                &inventory,
                purchase_tx("p1", "INV-1", date(2024, 1, 1), dec!(10), dec!(100)),
            )
            .unwrap();
        ledger
            .add_transaction(&inventory, sale_tx("s1", date(2024, 3, 1), dec!(15)))
            .unwrap();

        let (classified, _, outcome) = run_matcher(&ledger, &Config::default());

        assert_eq!(outcome.matched, 1);
        // Oldest lot fully consumed, newer lot split 5/5.
        assert!(classified.records["p1"].checked);
        let newer = &classified.records["p2"];
        assert!(!newer.checked);
        assert_eq!(newer.amount, dec!(5));
        assert_eq!(newer.properties.get_decimal(keys::TOTAL_COST), Some(dec!(100)));
        // Sale cost: 100 + 5 * 20 = 200.
        assert_eq!(
            classified.records["s1"].properties.get_decimal(keys::TOTAL_COST),
            Some(dec!(200))
        );
    }

    #[test]
    fn test_sale_exceeding_stock_is_left_unmatched() {
        let mut ledger = seed_books();
        let inventory = BookId::new(INVENTORY);
        ledger
            .add_transaction(
                &inventory,
                purchase_tx("p1", "INV-1", date(2024, 1, 1), dec!(10), dec!(100)),
            )
            .unwrap();
        ledger
            .add_transaction(&inventory, sale_tx("s1", date(2024, 1, 10), dec!(12)))
            .unwrap();

        let (classified, _, outcome) = run_matcher(&ledger, &Config::default());

        assert_eq!(outcome, MatchOutcome { matched: 0, unmatched: 1 });
        assert!(!classified.records["s1"].checked);
    }

    #[test]
    fn test_no_lots_skips_sales() {
        let mut ledger = seed_books();
        let inventory = BookId::new(INVENTORY);
        ledger
            .add_transaction(&inventory, sale_tx("s1", date(2024, 1, 10), dec!(3)))
            .unwrap();

        let (_, buffer, outcome) = run_matcher(&ledger, &Config::default());
        assert_eq!(outcome, MatchOutcome::default());
        assert!(buffer.is_empty());
    }
}
