//! Lot and sale classification.
//!
//! The first phase of a pass: read every unresolved inventory transaction
//! touching a tracked good and bucket it by role. Classification is
//! read-only; the running totals it produces drive the aggregate
//! quantity check before anything is staged.

use lotledger_core::{keys, AccountKind, CreditNote, Decimal, Lot, NaiveDate, SaleRecord, TxRecord};
use lotledger_service::{BookId, LedgerService, ServiceError, TxQuery};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::error::Violation;

/// The classified view of one tracked good's unresolved transactions.
#[derive(Debug, Default)]
pub struct ClassifiedAccount {
    /// Unmatched sales of the good.
    pub sales: Vec<SaleRecord>,
    /// Open purchase lots, keyed by purchase code.
    pub purchases: BTreeMap<String, Lot>,
    /// Unapplied credit notes, keyed by the purchase code they reduce.
    pub credit_notes: BTreeMap<String, CreditNote>,
    /// The raw records behind every classified entry, by transaction id.
    pub records: HashMap<String, TxRecord>,
    /// Running sum of sale quantities.
    pub total_sold: Decimal,
    /// Running sum of purchase quantities minus credit-note quantities.
    pub total_purchased: Decimal,
}

impl ClassifiedAccount {
    /// Check the aggregate quantity invariant: selling more than was
    /// ever purchased is invalid input data and aborts the pass before
    /// anything is staged.
    pub fn check_quantities(&self) -> Result<(), Violation> {
        if self.total_sold > self.total_purchased {
            Err(Violation::SalesExceedPurchases)
        } else {
            Ok(())
        }
    }
}

/// Classify all unresolved transactions of `account_name` dated up to and
/// including `until`.
///
/// A transaction whose debit side is outgoing-typed is a sale; one whose
/// debit side is incoming-typed and carries the credit-note marker is a
/// credit note; one whose credit side is incoming-typed is a purchase.
/// Anything else (transfers between inventory accounts, opening
/// balances) is left alone.
pub fn classify_account<S: LedgerService>(
    service: &S,
    book: &BookId,
    account_name: &str,
    until: NaiveDate,
) -> Result<ClassifiedAccount, ServiceError> {
    let query = TxQuery::on_account(account_name).with_before(until);
    let mut classified = ClassifiedAccount::default();

    for record in service.query_transactions(book, &query)? {
        if record.debit.kind == AccountKind::Outgoing {
            let sale = SaleRecord::from_record(&record);
            classified.total_sold += sale.quantity;
            classified.sales.push(sale);
        } else if record.debit.kind == AccountKind::Incoming
            && record.properties.contains(keys::CREDIT_NOTE)
        {
            let note = CreditNote::from_record(&record);
            classified.total_purchased -= note.quantity;
            if let Some(previous) = classified
                .credit_notes
                .insert(note.purchase_code.clone(), note)
            {
                warn!(
                    purchase_code = %previous.purchase_code,
                    "duplicate credit note for purchase code; keeping the later record"
                );
            }
        } else if record.credit.kind == AccountKind::Incoming {
            let lot = Lot::from_record(&record);
            classified.total_purchased += lot.quantity;
            if let Some(previous) = classified.purchases.insert(lot.purchase_code.clone(), lot)
            {
                warn!(
                    purchase_code = %previous.purchase_code,
                    "duplicate purchase code; keeping the later lot"
                );
            }
        } else {
            continue;
        }
        classified.records.insert(record.id.clone(), record);
    }

    Ok(classified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{credit_note_tx, purchase_tx, sale_tx, seed_books, INVENTORY};
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_partitions_by_role() {
        let mut ledger = seed_books();
        let book = BookId::new(INVENTORY);
        ledger
            .add_transaction(&book, purchase_tx("p1", "INV-1", date(2024, 1, 1), dec!(10), dec!(100)))
            .unwrap();
        ledger
            .add_transaction(&book, sale_tx("s1", date(2024, 1, 10), dec!(4)))
            .unwrap();
        ledger
            .add_transaction(&book, credit_note_tx("c1", "INV-1", date(2024, 1, 5), dec!(3)))
            .unwrap();

        let classified =
            classify_account(&ledger, &book, "Widgets", date(2024, 2, 1)).unwrap();

        assert_eq!(classified.sales.len(), 1);
        assert_eq!(classified.purchases.len(), 1);
        assert_eq!(classified.credit_notes.len(), 1);
        assert_eq!(classified.total_sold, dec!(4));
        assert_eq!(classified.total_purchased, dec!(7));
        assert!(classified.check_quantities().is_ok());
    }

    #[test]
    fn test_checked_records_excluded() {
        let mut ledger = seed_books();
        let book = BookId::new(INVENTORY);
        let mut purchase = purchase_tx("p1", "INV-1", date(2024, 1, 1), dec!(10), dec!(100));
        purchase.checked = true;
        ledger.add_transaction(&book, purchase).unwrap();

        let classified =
            classify_account(&ledger, &book, "Widgets", date(2024, 2, 1)).unwrap();
        assert!(classified.purchases.is_empty());
    }

    #[test]
    fn test_date_bound_is_inclusive() {
        let mut ledger = seed_books();
        let book = BookId::new(INVENTORY);
        ledger
            .add_transaction(&book, purchase_tx("p1", "INV-1", date(2024, 2, 1), dec!(10), dec!(100)))
            .unwrap();
        ledger
            .add_transaction(&book, purchase_tx("p2", "INV-2", date(2024, 2, 2), dec!(5), dec!(50)))
            .unwrap();

        let classified =
            classify_account(&ledger, &book, "Widgets", date(2024, 2, 1)).unwrap();
        assert_eq!(classified.purchases.len(), 1);
        assert!(classified.purchases.contains_key("INV-1"));
    }

    #[test]
    fn test_oversold() {
        let mut ledger = seed_books();
        let book = BookId::new(INVENTORY);
        ledger
            .add_transaction(&book, purchase_tx("p1", "INV-1", date(2024, 1, 1), dec!(10), dec!(100)))
            .unwrap();
        ledger
            .add_transaction(&book, sale_tx("s1", date(2024, 1, 10), dec!(12)))
            .unwrap();

        let classified =
            classify_account(&ledger, &book, "Widgets", date(2024, 2, 1)).unwrap();
        assert_eq!(
            classified.check_quantities(),
            Err(Violation::SalesExceedPurchases)
        );
    }
}
