use crate::commands::{CmdMessage, CmdResult};
use crate::error::{InfobaseError, Result};
use crate::store::{RecordStore, StorageBackend};

/// Deletes the given ids in order.
///
/// A single id that is not present is an error. For several ids, absent ones
/// are reported and skipped while the rest are deleted.
pub fn run<B: StorageBackend>(store: &mut RecordStore<B>, ids: &[u64]) -> Result<CmdResult> {
    if ids.is_empty() {
        return Err(InfobaseError::Api("No ids given to delete".into()));
    }
    if let [id] = ids {
        let record = store.delete(*id)?;
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Record deleted ({}): {}",
            record.id, record.title
        )));
        result.affected_records.push(record);
        return Ok(result);
    }

    let mut result = CmdResult::default();
    let (present, missing): (Vec<u64>, Vec<u64>) = ids
        .iter()
        .copied()
        .partition(|id| store.get_by_id(*id).is_some());

    if !missing.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "Ids not found: {}",
            join_ids(&missing)
        )));
        result.missing_ids = missing;
    }

    for id in present {
        // A duplicate id in the request may already be gone.
        match store.delete(id) {
            Ok(record) => result.affected_records.push(record),
            Err(InfobaseError::RecordNotFound(_)) => result.missing_ids.push(id),
            Err(e) => return Err(e),
        }
    }

    if result.affected_records.is_empty() {
        result.add_message(CmdMessage::error("No records were deleted"));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Deleted {} records: {}",
            result.affected_records.len(),
            join_ids(
                &result
                    .affected_records
                    .iter()
                    .map(|r| r.id)
                    .collect::<Vec<_>>()
            )
        )));
    }
    Ok(result)
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
