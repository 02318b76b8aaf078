//! Shared fixtures for the unit tests in this crate.

use chrono::NaiveDate;
use lotledger_core::{keys, Account, AccountKind, AccountRef, Properties, TxRecord};
use lotledger_service::{BookId, MemoryLedger};
use rust_decimal::Decimal;

/// Inventory book id used by fixtures.
pub const INVENTORY: &str = "inventory";
/// Financial book id used by fixtures.
pub const FINANCIAL: &str = "financial";

/// A ledger with both books and the standard fixture accounts.
pub fn seed_books() -> MemoryLedger {
    let mut ledger = MemoryLedger::new();
    let inventory = BookId::new(INVENTORY);
    let financial = BookId::new(FINANCIAL);
    ledger.add_book(inventory.clone(), 2);
    ledger.add_book(financial.clone(), 2);

    for (book, prefix) in [(&inventory, "i"), (&financial, "f")] {
        ledger
            .add_account(
                book,
                Account::new(format!("{prefix}_good"), "Widgets", AccountKind::Asset),
            )
            .unwrap();
        ledger
            .add_account(
                book,
                Account::new(format!("{prefix}_sup"), "Supplier", AccountKind::Incoming),
            )
            .unwrap();
        ledger
            .add_account(
                book,
                Account::new(format!("{prefix}_cus"), "Customers", AccountKind::Outgoing),
            )
            .unwrap();
    }
    ledger
        .add_account(
            &financial,
            Account::new("f_cogs", "Cost of goods sold", AccountKind::Outgoing),
        )
        .unwrap();
    ledger
}

fn base_tx(id: &str, date: NaiveDate, amount: Decimal) -> TxRecord {
    TxRecord {
        id: id.to_string(),
        date,
        amount,
        debit: AccountRef::new("i_good", "Widgets", AccountKind::Asset),
        credit: AccountRef::new("i_sup", "Supplier", AccountKind::Incoming),
        description: String::new(),
        properties: Properties::new(),
        remote_ids: vec![],
        checked: false,
        trashed: false,
        locked: false,
        created_at: 0,
        agent_id: None,
    }
}

/// An inventory purchase: goods flow from the supplier to the tracked
/// good, with the purchase code and total cost recorded as properties.
pub fn purchase_tx(
    id: &str,
    code: &str,
    date: NaiveDate,
    quantity: Decimal,
    cost: Decimal,
) -> TxRecord {
    let mut tx = base_tx(id, date, quantity);
    tx.properties.set(keys::PURCHASE_CODE, code);
    tx.properties.set_decimal(keys::TOTAL_COST, cost);
    tx
}

/// An inventory sale: goods flow from the tracked good to customers.
pub fn sale_tx(id: &str, date: NaiveDate, quantity: Decimal) -> TxRecord {
    let mut tx = base_tx(id, date, quantity);
    tx.debit = AccountRef::new("i_cus", "Customers", AccountKind::Outgoing);
    tx.credit = AccountRef::new("i_good", "Widgets", AccountKind::Asset);
    tx
}

/// An inventory credit note: goods flow back to the supplier, keyed to
/// the purchase it reduces.
pub fn credit_note_tx(id: &str, code: &str, date: NaiveDate, quantity: Decimal) -> TxRecord {
    let mut tx = base_tx(id, date, quantity);
    tx.debit = AccountRef::new("i_sup", "Supplier", AccountKind::Incoming);
    tx.credit = AccountRef::new("i_good", "Widgets", AccountKind::Asset);
    tx.properties.set(keys::CREDIT_NOTE, "true");
    tx.properties.set(keys::PURCHASE_CODE, code);
    tx
}

/// A checked financial posting carrying extra cost for a purchase,
/// distinguished from the original purchase by its own invoice number.
pub fn additional_cost_tx(
    id: &str,
    code: &str,
    invoice: &str,
    date: NaiveDate,
    amount: Decimal,
) -> TxRecord {
    let mut tx = base_tx(id, date, amount);
    tx.debit = AccountRef::new("f_good", "Widgets", AccountKind::Asset);
    tx.credit = AccountRef::new("f_sup", "Supplier", AccountKind::Incoming);
    tx.properties.set(keys::PURCHASE_CODE, code);
    tx.properties.set(keys::PURCHASE_INVOICE, invoice);
    tx.checked = true;
    tx
}

/// A checked financial credit note against a purchase.
pub fn financial_credit_note_tx(
    id: &str,
    code: &str,
    date: NaiveDate,
    amount: Decimal,
) -> TxRecord {
    let mut tx = base_tx(id, date, amount);
    tx.debit = AccountRef::new("f_sup", "Supplier", AccountKind::Incoming);
    tx.credit = AccountRef::new("f_good", "Widgets", AccountKind::Asset);
    tx.properties.set(keys::CREDIT_NOTE, "true");
    tx.properties.set(keys::PURCHASE_CODE, code);
    tx.checked = true;
    tx
}
