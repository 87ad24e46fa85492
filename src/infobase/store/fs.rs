use super::StorageBackend;
use crate::error::{InfobaseError, Result};
use crate::model::Record;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stores the whole collection as one pretty-printed JSON array.
pub struct FsBackend {
    data_file: PathBuf,
}

impl FsBackend {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }
}

impl StorageBackend for FsBackend {
    fn load(&self) -> Result<Option<Vec<Record>>> {
        if !self.data_file.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.data_file).map_err(InfobaseError::Io)?;
        let records: Vec<Record> =
            serde_json::from_str(&content).map_err(InfobaseError::Serialization)?;
        Ok(Some(records))
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        write_json_atomic(&self.data_file, records)
    }

    fn size(&self) -> Result<u64> {
        match fs::metadata(&self.data_file) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(InfobaseError::Io(e)),
        }
    }

    fn location(&self) -> PathBuf {
        self.data_file.clone()
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(InfobaseError::Io)?;
        }
    }
    Ok(())
}

/// Serializes `value` as indented UTF-8 JSON and moves it over `path` in
/// one rename, so readers never see a half-written file.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let content = serde_json::to_string_pretty(value).map_err(InfobaseError::Serialization)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| InfobaseError::Store(format!("Not a file path: {}", path.display())))?;
    let tmp_path = path.with_file_name(format!(".{}-{}.tmp", file_name, Uuid::new_v4()));

    fs::write(&tmp_path, content).map_err(InfobaseError::Io)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(InfobaseError::Io(e));
    }
    Ok(())
}

pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = fs::read_to_string(path).map_err(InfobaseError::Io)?;
    serde_json::from_str(&content).map_err(InfobaseError::Serialization)
}
