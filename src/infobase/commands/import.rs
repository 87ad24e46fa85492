use crate::commands::{CmdMessage, CmdResult};
use crate::error::{InfobaseError, Result};
use crate::model::{basic_searchable_text, ContentType, Metadata, Record, Timestamp};
use crate::store::fs::read_json;
use crate::store::{RecordStore, StorageBackend};
use serde::Deserialize;
use std::path::Path;

/// The shape accepted for each element of an import file. Ids, the index
/// and `updated_at` are ignored because import always replaces them. A
/// `created_at` in any layout is kept as given.
#[derive(Debug, Deserialize)]
struct ImportedRecord {
    title: String,
    content: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    content_type: ContentType,
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    created_at: Option<Timestamp>,
}

impl ImportedRecord {
    fn into_record(self, stamp: &Timestamp) -> Record {
        let searchable_text = basic_searchable_text(&self.title, &self.content, &self.tags);

        Record {
            id: 0,
            title: self.title,
            content: self.content,
            url: self.url,
            tags: self.tags,
            content_type: self.content_type,
            metadata: self.metadata,
            searchable_text,
            created_at: self.created_at.unwrap_or_else(|| stamp.clone()),
            updated_at: stamp.clone(),
        }
    }
}

/// Merges a JSON array of records into the store.
///
/// Every entry is appended with a fresh id that continues from the current
/// collection size, its index rebuilt from title, content and tags, and
/// `updated_at` set to now. Nothing is appended unless every entry parses.
/// No deduplication against existing records is done.
pub fn run<B: StorageBackend>(store: &mut RecordStore<B>, path: &Path) -> Result<CmdResult> {
    let items = match read_json(path)? {
        serde_json::Value::Array(items) => items,
        _ => {
            return Err(InfobaseError::Import(format!(
                "{} does not contain a JSON array",
                path.display()
            )))
        }
    };

    let stamp = Timestamp::now();
    let batch = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<ImportedRecord>(item)
                .map(|entry| entry.into_record(&stamp))
                .map_err(|e| InfobaseError::Import(format!("entry {}: {}", i + 1, e)))
        })
        .collect::<Result<Vec<_>>>()?;

    let count = batch.len();
    let ids = store.append_batch(batch);
    log::info!("Imported {} records from {}", count, path.display());

    let mut result = CmdResult::default()
        .with_affected_records(store.records()[store.len() - ids.len()..].to_vec());
    result.add_message(CmdMessage::success(format!(
        "Imported {} records from {}",
        count,
        path.display()
    )));
    Ok(result)
}
