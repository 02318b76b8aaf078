//! The batch mutation buffer.
//!
//! Every mutation an engine pass wants to make is staged here and written
//! in one commit at the very end. That makes a pass all-or-nothing with
//! respect to the ledger: validation failures, lock conflicts and
//! cancellation all happen before anything is written.
//!
//! Two id spaces meet in this buffer. Records that already exist are
//! staged under their ledger id; records to be created are staged under a
//! locally generated temporary id, and the mapping to real ids only comes
//! into existence when the create step of the commit returns. The commit
//! resolves that mapping last, after creates and updates, and hands it
//! back in the receipt.

use lotledger_core::{TxDraft, TxRecord};
use lotledger_service::{BookPair, LedgerService, ServiceError};
use std::collections::HashMap;
use tracing::debug;

/// Generates per-pass temporary ids for records staged before creation.
#[derive(Debug, Default)]
pub struct TempIds {
    next: u64,
}

impl TempIds {
    /// Create a fresh generator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next temporary id.
    pub fn next_id(&mut self) -> String {
        self.next += 1;
        format!("tmp_{:05}", self.next)
    }
}

/// An insertion-ordered map keyed by id; restaging a key replaces the
/// earlier stage in place.
#[derive(Debug)]
struct Staged<T> {
    entries: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Staged<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Staged<T> {
    fn put(&mut self, key: String, value: T) {
        if let Some(&at) = self.index.get(&key) {
            self.entries[at] = value;
        } else {
            self.index.insert(key, self.entries.len());
            self.entries.push(value);
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mutations staged during one pass, committed in a single batch.
#[derive(Debug)]
pub struct MutationBuffer {
    agent_id: String,
    inventory_creates: Staged<TxDraft>,
    inventory_updates: Staged<TxRecord>,
    financial_creates: Staged<TxDraft>,
    inventory_trash: Staged<String>,
    financial_trash: Staged<String>,
    locked: bool,
}

/// What a commit created: temporary id to ledger id, per book.
#[derive(Debug, Default)]
pub struct CommitReceipt {
    /// Created inventory lots.
    pub inventory_ids: HashMap<String, String>,
    /// Created financial postings.
    pub financial_ids: HashMap<String, String>,
}

impl MutationBuffer {
    /// Create a buffer stamping `agent_id` on everything it stages.
    #[must_use]
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            inventory_creates: Staged::default(),
            inventory_updates: Staged::default(),
            financial_creates: Staged::default(),
            inventory_trash: Staged::default(),
            financial_trash: Staged::default(),
            locked: false,
        }
    }

    /// Stage an inventory record for creation, keyed by temporary id.
    pub fn stage_inventory_create(&mut self, draft: TxDraft) {
        let draft = draft.with_agent(self.agent_id.clone());
        self.inventory_creates.put(draft.temp_id.clone(), draft);
    }

    /// Stage an inventory record for update, keyed by ledger id.
    ///
    /// Restaging the same record later in the pass replaces the earlier
    /// stage, so the committed state is always the cumulative one.
    pub fn stage_inventory_update(&mut self, record: TxRecord) {
        self.note_locked(&record);
        let mut record = record;
        record.agent_id = Some(self.agent_id.clone());
        self.inventory_updates.put(record.id.clone(), record);
    }

    /// Stage a financial posting for creation, keyed by temporary id.
    pub fn stage_financial_create(&mut self, draft: TxDraft) {
        let draft = draft.with_agent(self.agent_id.clone());
        self.financial_creates.put(draft.temp_id.clone(), draft);
    }

    /// Stage an inventory record for trashing.
    pub fn stage_inventory_trash(&mut self, record: &TxRecord) {
        self.note_locked(record);
        self.inventory_trash.put(record.id.clone(), record.id.clone());
    }

    /// Stage a financial posting for trashing.
    pub fn stage_financial_trash(&mut self, record: &TxRecord) {
        self.note_locked(record);
        self.financial_trash.put(record.id.clone(), record.id.clone());
    }

    fn note_locked(&mut self, record: &TxRecord) {
        if record.locked {
            self.locked = true;
        }
    }

    /// Whether any staged record was administratively locked.
    ///
    /// Callers poll this before committing; a locked record means the
    /// whole pass must abort without writing anything.
    #[must_use]
    pub const fn has_locked(&self) -> bool {
        self.locked
    }

    /// Whether nothing has been staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inventory_creates.is_empty()
            && self.inventory_updates.is_empty()
            && self.financial_creates.is_empty()
            && self.inventory_trash.is_empty()
            && self.financial_trash.is_empty()
    }

    /// Commit every staged mutation.
    ///
    /// Order matters: inventory creates run first (updates may reference
    /// the created lots), then inventory updates, then financial
    /// creates, then trashes, and finally the temporary ids are resolved
    /// against the created records. A service failure part-way through
    /// propagates as-is; the ledger may hold a partial batch and the
    /// caller is expected to re-run the pass, which the checked-flag
    /// guards make idempotent.
    pub fn commit<S: LedgerService>(
        self,
        service: &mut S,
        books: &BookPair,
    ) -> Result<CommitReceipt, ServiceError> {
        debug!(
            inventory_creates = self.inventory_creates.len(),
            inventory_updates = self.inventory_updates.len(),
            financial_creates = self.financial_creates.len(),
            inventory_trash = self.inventory_trash.len(),
            financial_trash = self.financial_trash.len(),
            "committing staged mutations"
        );

        let mut receipt = CommitReceipt::default();

        let created = service.batch_create(&books.inventory, &self.inventory_creates.entries)?;
        for (draft, record) in self.inventory_creates.entries.iter().zip(&created) {
            receipt
                .inventory_ids
                .insert(draft.temp_id.clone(), record.id.clone());
        }

        service.batch_update(&books.inventory, &self.inventory_updates.entries)?;

        let created = service.batch_create(&books.financial, &self.financial_creates.entries)?;
        for (draft, record) in self.financial_creates.entries.iter().zip(&created) {
            receipt
                .financial_ids
                .insert(draft.temp_id.clone(), record.id.clone());
        }

        if !self.financial_trash.is_empty() {
            service.batch_trash(&books.financial, &self.financial_trash.entries)?;
        }
        if !self.inventory_trash.is_empty() {
            service.batch_trash(&books.inventory, &self.inventory_trash.entries)?;
        }

        Ok(receipt)
    }
}
