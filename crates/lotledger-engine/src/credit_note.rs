//! Credit-note pre-processing.
//!
//! Credit notes reduce what a purchase lot can supply, so they must be
//! applied before FIFO matching reads the lot quantities. Each applied
//! note carves a checked child lot out of its purchase, exactly like a
//! partial sale consumption, leaving the parent with the post-return
//! quantity and proportional cost.

use lotledger_core::{keys, Decimal, TxDraft};
use tracing::{debug, warn};

use crate::buffer::{MutationBuffer, TempIds};
use crate::classify::ClassifiedAccount;
use crate::error::Violation;

/// Apply every classified credit note against its purchase lot, staging
/// the splits through the buffer.
///
/// A note exceeding what remains in its lot is a data inconsistency; the
/// pass aborts before anything is committed.
pub fn apply_credit_notes(
    classified: &mut ClassifiedAccount,
    buffer: &mut MutationBuffer,
    temp_ids: &mut TempIds,
) -> Result<(), Violation> {
    let codes: Vec<String> = classified.credit_notes.keys().cloned().collect();

    for code in codes {
        let note = classified.credit_notes[&code].clone();
        let Some(lot) = classified.purchases.get_mut(&code) else {
            warn!(purchase_code = %code, "credit note without an open purchase lot; skipping");
            continue;
        };

        let remaining = lot.quantity - note.quantity;
        if remaining <= Decimal::ZERO {
            return Err(Violation::CreditNoteExceedsLot);
        }

        lot.record_original();
        let split = lot.split(note.quantity);
        lot.quantity = split.remainder;
        lot.cost = split.remainder_cost;

        debug!(
            purchase_code = %code,
            returned = %split.consumed,
            remaining = %split.remainder,
            "applying credit note"
        );

        let Some(parent) = classified.records.get(&lot.tx_id).cloned() else {
            continue;
        };

        let mut child = TxDraft::new(
            temp_ids.next_id(),
            note.date,
            split.consumed,
            parent.debit.name.clone(),
            parent.credit.name.clone(),
        )
        .with_description(parent.description.clone())
        .with_remote_id(note.tx_id.clone())
        .checked();
        child.properties.set(keys::PURCHASE_CODE, code.clone());
        child.properties.set(keys::PARENT_ID, lot.tx_id.clone());
        child
            .properties
            .set_decimal(keys::TOTAL_COST, split.consumed_cost);
        buffer.stage_inventory_create(child);

        let lot_id = lot.tx_id.clone();
        let lot_snapshot = lot.clone();
        if let Some(record) = classified.records.get_mut(&lot_id) {
            lot_snapshot.apply_to(record);
            buffer.stage_inventory_update(record.clone());
        }

        if let Some(record) = classified.records.get_mut(&note.tx_id) {
            record.checked = true;
            buffer.stage_inventory_update(record.clone());
        }
    }

    Ok(())
}
