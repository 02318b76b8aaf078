//! The reset engine.
//!
//! Walks everything this engine previously synthesized for an account
//! and reverses it: synthesized COGS postings and split children are
//! trashed, split originals get their pre-split quantity and cost back,
//! matched sales and applied credit notes are unchecked and stripped of
//! computed state. After a reset the account looks exactly as it did
//! before the first calculation, so recomputation can restart from
//! source data.

use lotledger_core::{keys, AccountKind, TxRecord};
use lotledger_service::{BookPair, LedgerService, ServiceError, TxQuery};
use tracing::debug;

use crate::buffer::MutationBuffer;
use crate::config::Config;

/// Stage the reversal of every engine-written record for `good_name`.
///
/// Only records stamped with this engine's agent id are touched; records
/// other agents or operators wrote are left alone. Returns the number of
/// records staged.
pub fn stage_reset<S: LedgerService>(
    service: &S,
    books: &BookPair,
    config: &Config,
    good_name: &str,
    buffer: &mut MutationBuffer,
) -> Result<usize, ServiceError> {
    let query = TxQuery::on_account(good_name).with_checked();
    let mut touched = 0;

    for record in service.query_transactions(&books.inventory, &query)? {
        if record.agent_id.as_deref() != Some(config.agent_id.as_str()) {
            continue;
        }

        if record.debit.kind == AccountKind::Outgoing
            && record.properties.contains(keys::PURCHASE_LOG)
        {
            reset_sale(service, books, buffer, record)?;
        } else if record.properties.contains(keys::PARENT_ID) {
            buffer.stage_inventory_trash(&record);
        } else if record.properties.contains(keys::ORIGINAL_QUANTITY) {
            reset_split_original(buffer, record);
        } else if record.properties.contains(keys::CREDIT_NOTE) {
            let mut record = record;
            record.checked = false;
            buffer.stage_inventory_update(record);
        } else {
            continue;
        }
        touched += 1;
    }

    debug!(account = %good_name, touched, "staged reset");
    Ok(touched)
}

/// A matched sale: trash its linked COGS posting, then strip the
/// computed cost and log and put it back into the unmatched pool.
fn reset_sale<S: LedgerService>(
    service: &S,
    books: &BookPair,
    buffer: &mut MutationBuffer,
    mut record: TxRecord,
) -> Result<(), ServiceError> {
    if let Some(posting) = service.find_by_remote_id(&books.financial, &record.id)? {
        buffer.stage_financial_trash(&posting);
    }
    record.checked = false;
    record.properties.remove(keys::TOTAL_COST);
    record.properties.remove(keys::PURCHASE_LOG);
    buffer.stage_inventory_update(record);
    Ok(())
}

/// A lot the matcher consumed or split: restore the preserved quantity
/// and cost, drop every trace of the calculation.
fn reset_split_original(buffer: &mut MutationBuffer, mut record: TxRecord) {
    if let Some(quantity) = record.properties.get_decimal(keys::ORIGINAL_QUANTITY) {
        record.amount = quantity;
    }
    if let Some(cost) = record.properties.get_decimal(keys::ORIGINAL_AMOUNT) {
        record.properties.set_decimal(keys::TOTAL_COST, cost);
    }
    record.properties.remove(keys::ORIGINAL_QUANTITY);
    record.properties.remove(keys::ORIGINAL_AMOUNT);
    record.properties.remove(keys::LIQUIDATION_LOG);
    record.properties.remove(keys::ADD_COSTS);
    record.properties.remove(keys::CREDIT_AMOUNT);
    record.checked = false;
    buffer.stage_inventory_update(record);
}
