use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::fs::write_json_atomic;
use crate::store::{RecordStore, StorageBackend};
use chrono::Local;
use std::path::PathBuf;

/// `export_<YYYYMMDD_HHMMSS>.json`, relative to the working directory.
pub fn default_export_path() -> PathBuf {
    PathBuf::from(format!("export_{}.json", Local::now().format("%Y%m%d_%H%M%S")))
}

/// Writes the full collection, unchanged, in the store's own file format.
pub fn run<B: StorageBackend>(store: &RecordStore<B>, path: Option<PathBuf>) -> Result<CmdResult> {
    let path = path.unwrap_or_else(default_export_path);
    write_json_atomic(&path, store.records())?;
    log::info!("Exported {} records to {}", store.len(), path.display());

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} records to {}",
        store.len(),
        path.display()
    )));
    Ok(result.with_written_path(path))
}
