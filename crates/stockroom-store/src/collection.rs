//! Mutations on an in-memory record list, shared by every [`RecordStore`]
//! backend so the in-memory and on-disk stores cannot drift apart.
//!
//! [`RecordStore`]: crate::RecordStore

use stockroom_types::{InventoryRecord, NewRecord, RecordId, RecordPatch};

use crate::error::{StoreError, StoreResult};

/// Validate and append a new record under a fresh id.
pub(crate) fn append(
    records: &mut Vec<InventoryRecord>,
    new: NewRecord,
) -> StoreResult<InventoryRecord> {
    new.validate()?;

    if let Some(photo) = &new.photo {
        if records.iter().any(|r| r.photo.as_ref() == Some(photo)) {
            return Err(StoreError::DuplicatePhoto(photo.clone()));
        }
    }

    let id = RecordId::generate();
    if records.iter().any(|r| r.id == id) {
        return Err(StoreError::DuplicateId(id));
    }

    let record = new.into_record(id);
    records.push(record.clone());
    Ok(record)
}

/// Apply a patch in place. Returns the updated record and whether it changed.
pub(crate) fn patch(
    records: &mut [InventoryRecord],
    id: &RecordId,
    patch: &RecordPatch,
) -> Option<(InventoryRecord, bool)> {
    let record = records.iter_mut().find(|r| &r.id == id)?;
    let changed = patch.apply(record);
    Some((record.clone(), changed))
}

/// Remove a record, preserving the order of the rest.
pub(crate) fn remove(records: &mut Vec<InventoryRecord>, id: &RecordId) -> Option<InventoryRecord> {
    let index = records.iter().position(|r| &r.id == id)?;
    Some(records.remove(index))
}

pub(crate) fn find(records: &[InventoryRecord], id: &RecordId) -> Option<InventoryRecord> {
    records.iter().find(|r| &r.id == id).cloned()
}
