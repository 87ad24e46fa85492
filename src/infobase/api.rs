//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for UI clients (the bundled CLI, or anything else).
//!
//! It dispatches to `commands/*.rs`, wires the configuration into the store
//! and returns structured `Result<CmdResult>` values. It never prints and
//! never persists on its own: callers decide when to [`InfobaseApi::save`].
//!
//! Callers that only need pass/fail can collapse any result with
//! [`crate::error::Outcome::succeeded`].

use crate::commands;
use crate::config::InfobaseConfig;
use crate::error::Result;
use crate::model::{NewRecord, RecordPatch};
use crate::store::fs::FsBackend;
use crate::store::{RecordStore, StorageBackend};
use std::path::{Path, PathBuf};

/// The main API facade for information store operations.
///
/// Generic over `StorageBackend`:
/// - Production: `InfobaseApi<FsBackend>`
/// - Testing: `InfobaseApi<MemBackend>`
pub struct InfobaseApi<B: StorageBackend> {
    store: RecordStore<B>,
    config: InfobaseConfig,
}

impl InfobaseApi<FsBackend> {
    /// Opens the data file named by `config`, resolved against `home`.
    pub fn open(home: &Path, config: InfobaseConfig) -> Self {
        let backend = FsBackend::new(config.data_path(home));
        Self::new(backend, config)
    }
}

impl<B: StorageBackend> InfobaseApi<B> {
    pub fn new(backend: B, config: InfobaseConfig) -> Self {
        let store = RecordStore::open(backend)
            .with_id_policy(config.id_policy)
            .with_update_validation(config.validate_updates);
        Self { store, config }
    }

    pub fn add_record(&mut self, input: NewRecord) -> Result<commands::CmdResult> {
        commands::create::run(&mut self.store, input)
    }

    pub fn update_record(&mut self, id: u64, patch: RecordPatch) -> Result<commands::CmdResult> {
        commands::update::run(&mut self.store, id, patch)
    }

    pub fn delete_records(&mut self, ids: &[u64]) -> Result<commands::CmdResult> {
        commands::delete::run(&mut self.store, ids)
    }

    pub fn get_records(&self, filter: &RecordFilter) -> Result<commands::CmdResult> {
        commands::get::run(&self.store, filter)
    }

    pub fn view_records(&self, ids: &[u64]) -> Result<commands::CmdResult> {
        commands::get::by_ids(&self.store, ids)
    }

    pub fn search(&self, query: &str) -> Result<commands::CmdResult> {
        commands::search::run(&self.store, query, self.config.query_mode)
    }

    pub fn export(&self, path: Option<PathBuf>) -> Result<commands::CmdResult> {
        commands::export::run(&self.store, path)
    }

    pub fn import(&mut self, path: &Path) -> Result<commands::CmdResult> {
        commands::import::run(&mut self.store, path)
    }

    pub fn statistics(&self) -> Result<commands::CmdResult> {
        commands::stats::run(&self.store)
    }

    pub fn content_types(&self) -> Vec<TypeSummary> {
        commands::stats::catalogue(&self.store)
    }

    /// Persists the whole collection.
    pub fn save(&self) -> Result<()> {
        self.store.save()
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    pub fn config(&self) -> &InfobaseConfig {
        &self.config
    }
}

pub use crate::commands::get::RecordFilter;
pub use crate::commands::stats::{Statistics, TypeSummary};
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, ScoredRecord};
