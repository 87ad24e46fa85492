//! # Storage Layer
//!
//! [`RecordStore`] owns the in-memory collection of records and keeps every
//! record's derived index consistent across create, update and delete.
//! Persistence is delegated to a [`StorageBackend`], which only knows how to
//! read and write the whole collection at once.
//!
//! ## Implementations
//!
//! - [`fs::FsBackend`]: a single JSON file holding an array of records.
//!   Writes go to a temporary sibling first and are renamed into place.
//! - [`memory::MemBackend`]: keeps the serialized JSON in memory, for tests.
//!
//! ## Lifecycle
//!
//! The backing data is read once, when the store is opened. Mutations only
//! touch memory; nothing reaches the backend until [`RecordStore::save`] is
//! called. A missing or unreadable file yields an empty store, and a store
//! opened over unreadable data refuses to save so the file is never replaced
//! by that empty collection.

use crate::config::IdPolicy;
use crate::error::{InfobaseError, Result};
use crate::model::{self, ContentType, NewRecord, Record, RecordPatch};
use std::path::PathBuf;

pub mod fs;
pub mod memory;

/// Raw persistence of the full record collection.
pub trait StorageBackend {
    /// Read every stored record. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<Record>>>;

    /// Replace the stored collection.
    fn save(&self, records: &[Record]) -> Result<()>;

    /// Size in bytes of the stored data, 0 when absent.
    fn size(&self) -> Result<u64>;

    /// Where the data lives (real path, or a virtual one for memory).
    fn location(&self) -> PathBuf;
}

pub struct RecordStore<B: StorageBackend> {
    backend: B,
    records: Vec<Record>,
    id_policy: IdPolicy,
    validate_updates: bool,
    last_id: u64,
    load_error: Option<String>,
}

impl<B: StorageBackend> RecordStore<B> {
    /// Opens the store and loads whatever the backend holds. Load failures
    /// are logged, leave the store empty and block [`RecordStore::save`].
    pub fn open(backend: B) -> Self {
        let mut load_error = None;
        let records = match backend.load() {
            Ok(Some(records)) => {
                log::info!(
                    "Loaded {} records from {}",
                    records.len(),
                    backend.location().display()
                );
                records
            }
            Ok(None) => {
                log::info!(
                    "No data at {}, starting a new store",
                    backend.location().display()
                );
                Vec::new()
            }
            Err(e) => {
                log::warn!(
                    "Failed to load {}: {}; starting empty",
                    backend.location().display(),
                    e
                );
                load_error = Some(e.to_string());
                Vec::new()
            }
        };
        let last_id = records.iter().map(|r| r.id).max().unwrap_or(0);

        Self {
            backend,
            records,
            id_policy: IdPolicy::default(),
            validate_updates: false,
            last_id,
            load_error,
        }
    }

    pub fn with_id_policy(mut self, policy: IdPolicy) -> Self {
        self.id_policy = policy;
        self
    }

    pub fn with_update_validation(mut self, enabled: bool) -> Self {
        self.validate_updates = enabled;
        self
    }

    /// Why the backing data could not be read, if it couldn't.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Read-only view of the live collection, in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Writes the whole collection through the backend.
    pub fn save(&self) -> Result<()> {
        if let Some(reason) = &self.load_error {
            return Err(InfobaseError::Store(format!(
                "Refusing to overwrite {}: it could not be loaded ({})",
                self.backend.location().display(),
                reason
            )));
        }
        self.backend.save(&self.records)?;
        log::info!(
            "Saved {} records to {}",
            self.records.len(),
            self.backend.location().display()
        );
        Ok(())
    }

    /// Allocates the id for the `offset`-th record (0-based) of a batch
    /// about to be appended.
    fn next_id(&mut self, offset: usize) -> u64 {
        match self.id_policy {
            IdPolicy::Compact => (self.records.len() + offset + 1) as u64,
            IdPolicy::Monotonic => {
                self.last_id += 1;
                self.last_id
            }
        }
    }

    pub fn add(&mut self, input: NewRecord) -> Result<&Record> {
        model::validate(&input.title, &input.content, &input.content_type)?;

        let id = self.next_id(0);
        let record = Record::new(id, input);
        log::debug!("Adding record {}: {}", record.id, record.title);
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    pub fn update(&mut self, id: u64, patch: RecordPatch) -> Result<&Record> {
        let pos = self.position(id).ok_or(InfobaseError::RecordNotFound(id))?;

        if self.validate_updates {
            let mut candidate = self.records[pos].clone();
            patch.apply_to(&mut candidate);
            model::validate(
                &candidate.title,
                &candidate.content,
                &candidate.content_type,
            )?;
            self.records[pos] = candidate;
        } else {
            patch.apply_to(&mut self.records[pos]);
        }

        log::debug!("Updated record {}", id);
        Ok(&self.records[pos])
    }

    /// Removes the first record carrying `id`.
    pub fn delete(&mut self, id: u64) -> Result<Record> {
        let pos = self.position(id).ok_or(InfobaseError::RecordNotFound(id))?;
        log::debug!("Deleting record {}", id);
        Ok(self.records.remove(pos))
    }

    pub fn get_by_id(&self, id: u64) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    /// A detached copy of the collection.
    pub fn get_all(&self) -> Vec<Record> {
        self.records.clone()
    }

    /// Records of one content type, in collection order.
    pub fn get_by_type(&self, content_type: &ContentType) -> Vec<Record> {
        self.records
            .iter()
            .filter(|r| &r.content_type == content_type)
            .cloned()
            .collect()
    }

    /// Appends records coming from outside, giving each a fresh id in order.
    /// The records are otherwise stored as handed in.
    pub fn append_batch(&mut self, batch: Vec<Record>) -> Vec<u64> {
        let mut ids = Vec::with_capacity(batch.len());
        let mut assigned = Vec::with_capacity(batch.len());
        for (offset, mut record) in batch.into_iter().enumerate() {
            record.id = self.next_id(offset);
            ids.push(record.id);
            assigned.push(record);
        }
        self.records.extend(assigned);
        ids
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemBackend;
    use super::*;
    use crate::error::{Outcome, ValidationError};
    use crate::model::ContentType;

    fn store() -> RecordStore<MemBackend> {
        RecordStore::open(MemBackend::new())
    }

    fn article(title: &str) -> NewRecord {
        NewRecord::new(title, format!("{} body", title))
    }

    #[test]
    fn ids_increase_by_one_without_deletes() {
        let mut store = store();
        let ids: Vec<u64> = ["a", "b", "c", "d"]
            .iter()
            .map(|t| store.add(article(t)).unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn compact_policy_reuses_ids_after_delete() {
        let mut store = store();
        store.add(article("one")).unwrap();
        store.add(article("two")).unwrap();
        store.add(article("three")).unwrap();

        store.delete(1).unwrap();
        let id = store.add(article("four")).unwrap().id;

        // size was 2, so the new record collides with "three"
        assert_eq!(id, 3);
        let holders: Vec<&str> = store
            .records()
            .iter()
            .filter(|r| r.id == 3)
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(holders, vec!["three", "four"]);
    }

    #[test]
    fn monotonic_policy_never_reuses_ids() {
        let mut store = store().with_id_policy(IdPolicy::Monotonic);
        store.add(article("one")).unwrap();
        store.add(article("two")).unwrap();
        store.add(article("three")).unwrap();

        store.delete(3).unwrap();
        store.delete(1).unwrap();
        assert_eq!(store.add(article("four")).unwrap().id, 4);
    }

    #[test]
    fn monotonic_policy_continues_after_loaded_max() {
        let backend = MemBackend::new();
        {
            let mut first = RecordStore::open(backend.clone());
            first.add(article("one")).unwrap();
            first.add(article("two")).unwrap();
            first.delete(1).unwrap();
            first.save().unwrap();
        }
        let mut reopened = RecordStore::open(backend).with_id_policy(IdPolicy::Monotonic);
        assert_eq!(reopened.add(article("three")).unwrap().id, 3);
    }

    #[test]
    fn add_validation_gate() {
        let mut store = store();
        assert!(!store.add(NewRecord::new("", "x")).succeeded("add"));
        assert!(!store.add(NewRecord::new("   ", "x")).succeeded("add"));

        let err = store.add(NewRecord::new("t", "")).unwrap_err();
        assert_eq!(
            err.validation(),
            Some(ValidationError::EmptyArticleContent)
        );

        assert!(store
            .add(NewRecord::new("t", "").with_url("u").with_type(ContentType::Link))
            .succeeded("add"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn failed_add_leaves_store_untouched() {
        let mut store = store();
        store.add(article("kept")).unwrap();
        let _ = store.add(NewRecord::new("", ""));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_changes_only_given_fields() {
        let mut store = store();
        store
            .add(
                NewRecord::new("Title", "Body")
                    .with_url("http://a")
                    .with_tags(["one"]),
            )
            .unwrap();

        let updated = store
            .update(1, RecordPatch::new().content("  New body "))
            .unwrap();
        assert_eq!(updated.title, "Title");
        assert_eq!(updated.content, "New body");
        assert_eq!(updated.url, "http://a");
        assert_eq!(updated.tags, vec!["one"]);
        assert_eq!(updated.searchable_text, updated.derive_searchable_text());
    }

    #[test]
    fn update_rederives_index_from_resulting_state() {
        let mut store = store();
        store
            .add(NewRecord::new("Repo", "").with_type(ContentType::Link))
            .unwrap();

        let mut metadata = model::Metadata::new();
        metadata.insert("code".into(), serde_json::json!("Haskell"));
        store
            .update(
                1,
                RecordPatch::new()
                    .content_type(ContentType::Code)
                    .metadata(metadata)
                    .tags(["fp"]),
            )
            .unwrap();

        let record = store.get_by_id(1).unwrap();
        assert_eq!(record.searchable_text, "repo fp haskell");
        assert_eq!(record.searchable_text, record.derive_searchable_text());
    }

    #[test]
    fn update_unknown_id_fails() {
        let mut store = store();
        assert!(matches!(
            store.update(9, RecordPatch::new().title("x")),
            Err(InfobaseError::RecordNotFound(9))
        ));
    }

    #[test]
    fn update_is_lenient_by_default() {
        let mut store = store();
        store.add(article("a")).unwrap();
        store.update(1, RecordPatch::new().title("")).unwrap();
        assert_eq!(store.get_by_id(1).unwrap().title, "");
    }

    #[test]
    fn update_validation_when_enabled() {
        let mut store = store().with_update_validation(true);
        store.add(article("a")).unwrap();

        let err = store.update(1, RecordPatch::new().content(" ")).unwrap_err();
        assert_eq!(
            err.validation(),
            Some(ValidationError::EmptyArticleContent)
        );
        assert_eq!(store.get_by_id(1).unwrap().content, "a body");

        store
            .update(
                1,
                RecordPatch::new().content("").content_type(ContentType::Tool),
            )
            .unwrap();
    }

    #[test]
    fn delete_removes_first_match_only() {
        let mut store = store();
        store.add(article("one")).unwrap();
        store.add(article("two")).unwrap();
        store.delete(1).unwrap();
        store.add(article("three")).unwrap(); // id 2 again

        let removed = store.delete(2).unwrap();
        assert_eq!(removed.title, "two");
        assert_eq!(store.get_by_id(2).unwrap().title, "three");
        assert!(store.delete(42).is_err());
    }

    #[test]
    fn get_all_is_a_snapshot() {
        let mut store = store();
        store.add(article("one")).unwrap();

        let mut snapshot = store.get_all();
        snapshot[0].title = "mutated".into();
        snapshot.clear();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get_by_id(1).unwrap().title, "one");
    }

    #[test]
    fn save_and_reopen() {
        let backend = MemBackend::new();
        let mut store = RecordStore::open(backend.clone());
        store
            .add(NewRecord::new("Café notes", "naïve résumé").with_tags(["日本語"]))
            .unwrap();
        store.save().unwrap();

        let reopened = RecordStore::open(backend);
        assert_eq!(reopened.records(), store.records());
    }

    #[test]
    fn unreadable_data_opens_empty() {
        let backend = MemBackend::with_raw("{ not json");
        let store = RecordStore::open(backend);
        assert!(store.is_empty());
        assert!(store.load_error().is_some());
    }

    #[test]
    fn unreadable_data_is_never_overwritten() {
        let backend = MemBackend::with_raw("{ not json");
        let mut store = RecordStore::open(backend.clone());
        store.add(article("new")).unwrap();

        assert!(matches!(store.save(), Err(InfobaseError::Store(_))));
        assert_eq!(backend.raw().as_deref(), Some("{ not json"));
    }

    #[test]
    fn missing_data_can_be_saved() {
        let backend = MemBackend::new();
        let mut store = RecordStore::open(backend.clone());
        assert!(store.load_error().is_none());
        store.add(article("first")).unwrap();
        store.save().unwrap();
        assert!(backend.raw().is_some());
    }

    #[test]
    fn legacy_timestamps_load_and_save_back() {
        let backend = MemBackend::with_raw(
            r#"[{"id": 1, "title": "a", "content": "x",
                 "created_at": "2024-01-01 10:00:00", "updated_at": "2024-01-01 10:00:00"},
                {"id": 2, "title": "b", "content": "y",
                 "created_at": "2024-01-01T10:00:00", "updated_at": "2024-01-01T10:00:00"}]"#,
        );
        let mut store = RecordStore::open(backend.clone());
        assert_eq!(store.len(), 2);
        assert!(store.load_error().is_none());

        store.add(article("c")).unwrap();
        store.save().unwrap();

        let raw = backend.raw().unwrap();
        assert!(raw.contains("\"created_at\": \"2024-01-01T10:00:00\""));
        assert_eq!(RecordStore::open(backend).len(), 3);
    }

    #[test]
    fn save_failure_is_reported() {
        let backend = MemBackend::new();
        backend.set_simulate_write_error(true);
        let mut store = RecordStore::open(backend);
        store.add(article("one")).unwrap();
        assert!(!store.save().succeeded("save"));
    }

    #[test]
    fn append_batch_continues_from_current_size() {
        let mut store = store();
        store.add(article("one")).unwrap();
        store.add(article("two")).unwrap();

        let incoming = vec![
            Record::new(77, article("x")),
            Record::new(77, article("y")),
        ];
        assert_eq!(store.append_batch(incoming), vec![3, 4]);
    }
}
