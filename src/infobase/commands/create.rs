use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::NewRecord;
use crate::store::{RecordStore, StorageBackend};

pub fn run<B: StorageBackend>(store: &mut RecordStore<B>, input: NewRecord) -> Result<CmdResult> {
    let record = store.add(input)?.clone();

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Record added ({}): {}",
        record.id, record.title
    )));
    result.affected_records.push(record);
    Ok(result)
}
