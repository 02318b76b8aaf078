//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use chrono::NaiveDate;
use lotledger_core::{keys, Account, AccountKind, AccountRef, Properties, TxRecord};
use lotledger_service::{BookId, BookPair, MemoryLedger};
use rust_decimal::Decimal;

pub const INVENTORY: &str = "inventory";
pub const FINANCIAL: &str = "financial";
pub const GOOD_ACCOUNT: &str = "i_good";

pub fn books() -> BookPair {
    BookPair::new(FINANCIAL, INVENTORY)
}

pub fn inventory() -> BookId {
    BookId::new(INVENTORY)
}

pub fn financial() -> BookId {
    BookId::new(FINANCIAL)
}

/// A ledger with both books and the standard accounts: the tracked good
/// "Widgets" plus a supplier, customers and a COGS account.
pub fn seed_books() -> MemoryLedger {
    let mut ledger = MemoryLedger::new();
    ledger.add_book(inventory(), 2);
    ledger.add_book(financial(), 2);

    for (book, prefix) in [(&inventory(), "i"), (&financial(), "f")] {
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
            &financial(),
            Account::new("f_cogs", "Cost of goods sold", AccountKind::Outgoing),
        )
        .unwrap();
    ledger
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn base_tx(id: &str, on: NaiveDate, amount: Decimal) -> TxRecord {
    TxRecord {
        id: id.to_string(),
        date: on,
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

pub fn purchase_tx(
    id: &str,
    code: &str,
    on: NaiveDate,
    quantity: Decimal,
    cost: Decimal,
) -> TxRecord {
    let mut tx = base_tx(id, on, quantity);
    tx.properties.set(keys::PURCHASE_CODE, code);
    tx.properties.set_decimal(keys::TOTAL_COST, cost);
    tx
}

pub fn sale_tx(id: &str, on: NaiveDate, quantity: Decimal) -> TxRecord {
    let mut tx = base_tx(id, on, quantity);
    tx.debit = AccountRef::new("i_cus", "Customers", AccountKind::Outgoing);
    tx.credit = AccountRef::new("i_good", "Widgets", AccountKind::Asset);
    tx
}

pub fn credit_note_tx(id: &str, code: &str, on: NaiveDate, quantity: Decimal) -> TxRecord {
    let mut tx = base_tx(id, on, quantity);
    tx.debit = AccountRef::new("i_sup", "Supplier", AccountKind::Incoming);
    tx.credit = AccountRef::new("i_good", "Widgets", AccountKind::Asset);
    tx.properties.set(keys::CREDIT_NOTE, "true");
    tx.properties.set(keys::PURCHASE_CODE, code);
    tx
}

pub fn additional_cost_tx(
    id: &str,
    code: &str,
    invoice: &str,
    on: NaiveDate,
    amount: Decimal,
) -> TxRecord {
    let mut tx = base_tx(id, on, amount);
    tx.debit = AccountRef::new("f_good", "Widgets", AccountKind::Asset);
    tx.credit = AccountRef::new("f_sup", "Supplier", AccountKind::Incoming);
    tx.properties.set(keys::PURCHASE_CODE, code);
    tx.properties.set(keys::PURCHASE_INVOICE, invoice);
    tx.checked = true;
    tx
}
