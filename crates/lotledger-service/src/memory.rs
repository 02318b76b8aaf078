//! In-memory ledger.
//!
//! A complete, deterministic [`LedgerService`] implementation holding
//! books in process memory. Ids are assigned sequentially and creation
//! timestamps from a logical clock, so repeated runs over the same
//! fixture produce identical records. Used by the test suites and by the
//! CLI, which loads and stores a whole ledger as a JSON snapshot.

use lotledger_core::{Account, AccountRef, TxDraft, TxRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{BookId, LedgerService, ServiceError, TxQuery};

/// One book held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBook {
    /// Fractional-digit precision for amounts in this book.
    pub fraction_digits: u32,
    /// Accounts by id.
    pub accounts: BTreeMap<String, Account>,
    /// Transactions by id.
    pub transactions: BTreeMap<String, TxRecord>,
}

/// An in-memory ledger service over any number of books.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLedger {
    books: BTreeMap<BookId, MemoryBook>,
    next_id: u64,
    clock: i64,
}

impl MemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a book with the given precision.
    pub fn add_book(&mut self, book: impl Into<BookId>, fraction_digits: u32) {
        self.books.insert(
            book.into(),
            MemoryBook {
                fraction_digits,
                ..MemoryBook::default()
            },
        );
    }

    /// Add an account to a book.
    pub fn add_account(&mut self, book: &BookId, account: Account) -> Result<(), ServiceError> {
        self.book_mut(book)?
            .accounts
            .insert(account.id.clone(), account);
        Ok(())
    }

    /// Insert a transaction as-is, advancing the logical clock past its
    /// creation timestamp.
    pub fn add_transaction(
        &mut self,
        book: &BookId,
        record: TxRecord,
    ) -> Result<(), ServiceError> {
        self.clock = self.clock.max(record.created_at + 1);
        self.book_mut(book)?
            .transactions
            .insert(record.id.clone(), record);
        Ok(())
    }

    /// Look up a transaction for inspection.
    pub fn get_transaction(
        &self,
        book: &BookId,
        id: &str,
    ) -> Result<Option<&TxRecord>, ServiceError> {
        Ok(self.book(book)?.transactions.get(id))
    }

    /// All transactions of a book, in id order.
    pub fn transactions(
        &self,
        book: &BookId,
    ) -> Result<impl Iterator<Item = &TxRecord>, ServiceError> {
        Ok(self.book(book)?.transactions.values())
    }

    /// Mark a transaction administratively locked.
    pub fn lock_transaction(&mut self, book: &BookId, id: &str) -> Result<(), ServiceError> {
        let record = self
            .book_mut(book)?
            .transactions
            .get_mut(id)
            .ok_or_else(|| ServiceError::TransactionNotFound(id.to_string()))?;
        record.locked = true;
        Ok(())
    }

    fn book(&self, book: &BookId) -> Result<&MemoryBook, ServiceError> {
        self.books
            .get(book)
            .ok_or_else(|| ServiceError::UnknownBook(book.to_string()))
    }

    fn book_mut(&mut self, book: &BookId) -> Result<&mut MemoryBook, ServiceError> {
        self.books
            .get_mut(book)
            .ok_or_else(|| ServiceError::UnknownBook(book.to_string()))
    }

    fn resolve_account(book: &MemoryBook, name: &str, book_id: &BookId) -> Result<AccountRef, ServiceError> {
        book.accounts
            .values()
            .find(|a| a.name == name)
            .map(Account::to_ref)
            .ok_or_else(|| ServiceError::UnknownAccount {
                name: name.to_string(),
                book: book_id.to_string(),
            })
    }
}

impl LedgerService for MemoryLedger {
    fn fraction_digits(&self, book: &BookId) -> Result<u32, ServiceError> {
        Ok(self.book(book)?.fraction_digits)
    }

    fn get_account(&self, book: &BookId, account_id: &str) -> Result<Account, ServiceError> {
        self.book(book)?
            .accounts
            .get(account_id)
            .cloned()
            .ok_or_else(|| ServiceError::AccountNotFound(account_id.to_string()))
    }

    fn find_account_by_name(
        &self,
        book: &BookId,
        name: &str,
    ) -> Result<Option<Account>, ServiceError> {
        Ok(self
            .book(book)?
            .accounts
            .values()
            .find(|a| a.name == name)
            .cloned())
    }

    fn update_account(&mut self, book: &BookId, account: &Account) -> Result<(), ServiceError> {
        let accounts = &mut self.book_mut(book)?.accounts;
        if !accounts.contains_key(&account.id) {
            return Err(ServiceError::AccountNotFound(account.id.clone()));
        }
        accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    fn query_transactions(
        &self,
        book: &BookId,
        query: &TxQuery,
    ) -> Result<Vec<TxRecord>, ServiceError> {
        let mut records: Vec<TxRecord> = self
            .book(book)?
            .transactions
            .values()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| (a.date, a.created_at).cmp(&(b.date, b.created_at)));
        Ok(records)
    }

    fn find_by_remote_id(
        &self,
        book: &BookId,
        remote_id: &str,
    ) -> Result<Option<TxRecord>, ServiceError> {
        Ok(self
            .book(book)?
            .transactions
            .values()
            .find(|r| !r.trashed && r.has_remote_id(remote_id))
            .cloned())
    }

    fn batch_create(
        &mut self,
        book: &BookId,
        drafts: &[TxDraft],
    ) -> Result<Vec<TxRecord>, ServiceError> {
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = format!("tx_{:05}", self.next_id);
            self.next_id += 1;
            let created_at = self.clock;
            self.clock += 1;

            let entry = self.book(book)?;
            let record = TxRecord {
                id: id.clone(),
                date: draft.date,
                amount: draft.amount,
                debit: Self::resolve_account(entry, &draft.debit, book)?,
                credit: Self::resolve_account(entry, &draft.credit, book)?,
                description: draft.description.clone(),
                properties: draft.properties.clone(),
                remote_ids: draft.remote_ids.clone(),
                checked: draft.checked,
                trashed: false,
                locked: false,
                created_at,
                agent_id: draft.agent_id.clone(),
            };
            self.book_mut(book)?
                .transactions
                .insert(id, record.clone());
            created.push(record);
        }
        Ok(created)
    }

    fn batch_update(&mut self, book: &BookId, records: &[TxRecord]) -> Result<(), ServiceError> {
        let entry = self.book_mut(book)?;
        for record in records {
            let existing = entry
                .transactions
                .get(&record.id)
                .ok_or_else(|| ServiceError::TransactionNotFound(record.id.clone()))?;
            if existing.locked {
                return Err(ServiceError::Locked(record.id.clone()));
            }
            entry
                .transactions
                .insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    fn batch_trash(&mut self, book: &BookId, ids: &[String]) -> Result<(), ServiceError> {
        let entry = self.book_mut(book)?;
        for id in ids {
            let record = entry
                .transactions
                .get_mut(id)
                .ok_or_else(|| ServiceError::TransactionNotFound(id.clone()))?;
            if record.locked {
                return Err(ServiceError::Locked(id.clone()));
            }
            record.trashed = true;
            record.checked = false;
        }
        Ok(())
    }
}
