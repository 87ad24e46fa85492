use crate::commands::CmdResult;
use crate::error::{InfobaseError, Result};
use crate::model::ContentType;
use crate::store::{RecordStore, StorageBackend};

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub content_type: Option<ContentType>,
}

/// Lists records in collection order, optionally narrowed to one type.
pub fn run<B: StorageBackend>(store: &RecordStore<B>, filter: &RecordFilter) -> Result<CmdResult> {
    let records = match &filter.content_type {
        Some(content_type) => store.get_by_type(content_type),
        None => store.get_all(),
    };
    Ok(CmdResult::default().with_listed_records(records))
}

/// Fetches records by id, in the order asked.
pub fn by_ids<B: StorageBackend>(store: &RecordStore<B>, ids: &[u64]) -> Result<CmdResult> {
    let records = ids
        .iter()
        .map(|id| {
            store
                .get_by_id(*id)
                .cloned()
                .ok_or(InfobaseError::RecordNotFound(*id))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CmdResult::default().with_listed_records(records))
}
