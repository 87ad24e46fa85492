use super::StorageBackend;
use crate::error::{InfobaseError, Result};
use crate::model::Record;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Default)]
struct MemState {
    raw: Option<String>,
    simulate_write_error: bool,
}

/// In-memory storage backend for testing.
///
/// Holds the serialized JSON so a save/load cycle goes through the same
/// serde path as the file backend. Clones share state, which lets a test
/// reopen a store over the "same file".
#[derive(Clone, Default)]
pub struct MemBackend {
    state: Rc<RefCell<MemState>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the given raw content, as if read from disk.
    pub fn with_raw(raw: &str) -> Self {
        let backend = Self::new();
        backend.state.borrow_mut().raw = Some(raw.to_string());
        backend
    }

    pub fn raw(&self) -> Option<String> {
        self.state.borrow().raw.clone()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.state.borrow_mut().simulate_write_error = simulate;
    }
}

impl StorageBackend for MemBackend {
    fn load(&self) -> Result<Option<Vec<Record>>> {
        let state = self.state.borrow();
        match &state.raw {
            None => Ok(None),
            Some(raw) => {
                let records = serde_json::from_str(raw).map_err(InfobaseError::Serialization)?;
                Ok(Some(records))
            }
        }
    }

    fn save(&self, records: &[Record]) -> Result<()> {
        if self.state.borrow().simulate_write_error {
            return Err(InfobaseError::Store("Simulated write error".to_string()));
        }
        let raw = serde_json::to_string_pretty(records).map_err(InfobaseError::Serialization)?;
        self.state.borrow_mut().raw = Some(raw);
        Ok(())
    }

    fn size(&self) -> Result<u64> {
        Ok(self
            .state
            .borrow()
            .raw
            .as_ref()
            .map(|raw| raw.len() as u64)
            .unwrap_or(0))
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("memory://information_database.json")
    }
}
