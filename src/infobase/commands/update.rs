use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::RecordPatch;
use crate::store::{RecordStore, StorageBackend};

pub fn run<B: StorageBackend>(
    store: &mut RecordStore<B>,
    id: u64,
    patch: RecordPatch,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if patch.is_empty() {
        // Still counts as an update: the index and timestamp are refreshed.
        result.add_message(CmdMessage::info(format!("No fields given for record {}", id)));
    }

    let record = store.update(id, patch)?.clone();
    result.add_message(CmdMessage::success(format!(
        "Record updated ({}): {}",
        record.id, record.title
    )));
    result.affected_records.push(record);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::error::InfobaseError;
    use crate::model::NewRecord;
    use crate::store::memory::MemBackend;

    #[test]
    fn updates_record_content() {
        let mut store = RecordStore::open(MemBackend::new());
        create::run(&mut store, NewRecord::new("Title", "Old")).unwrap();

        let result = run(&mut store, 1, RecordPatch::new().content("New")).unwrap();
        assert_eq!(result.affected_records[0].content, "New");
        assert_eq!(store.get_by_id(1).unwrap().searchable_text, "title new");
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut store = RecordStore::open(MemBackend::new());
        assert!(matches!(
            run(&mut store, 3, RecordPatch::new().title("x")),
            Err(InfobaseError::RecordNotFound(3))
        ));
    }

    #[test]
    fn empty_patch_notes_it() {
        let mut store = RecordStore::open(MemBackend::new());
        create::run(&mut store, NewRecord::new("Title", "Body")).unwrap();

        let result = run(&mut store, 1, RecordPatch::new()).unwrap();
        assert_eq!(result.messages.len(), 2);
        assert_eq!(result.affected_records[0].title, "Title");
    }
}
