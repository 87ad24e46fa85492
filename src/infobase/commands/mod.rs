use crate::model::Record;
use serde::Serialize;
use std::path::PathBuf;

pub mod create;
pub mod delete;
pub mod export;
pub mod get;
pub mod import;
pub mod search;
pub mod stats;
pub mod update;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A search hit with the relevance score it was ranked by.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecord {
    pub score: u64,
    #[serde(flatten)]
    pub record: Record,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Records created, changed or removed by the command.
    pub affected_records: Vec<Record>,
    /// Records to display, already in display order.
    pub listed_records: Vec<Record>,
    /// Scores matching `listed_records` one to one, for searches.
    pub scores: Vec<u64>,
    pub statistics: Option<stats::Statistics>,
    pub written_path: Option<PathBuf>,
    /// Ids asked for that were not in the store.
    pub missing_ids: Vec<u64>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_records(mut self, records: Vec<Record>) -> Self {
        self.affected_records = records;
        self
    }

    pub fn with_listed_records(mut self, records: Vec<Record>) -> Self {
        self.listed_records = records;
        self
    }

    pub fn with_statistics(mut self, statistics: stats::Statistics) -> Self {
        self.statistics = Some(statistics);
        self
    }

    pub fn with_written_path(mut self, path: PathBuf) -> Self {
        self.written_path = Some(path);
        self
    }

    /// Pairs listed records with their scores.
    pub fn scored(&self) -> Vec<ScoredRecord> {
        self.listed_records
            .iter()
            .zip(self.scores.iter())
            .map(|(record, score)| ScoredRecord {
                score: *score,
                record: record.clone(),
            })
            .collect()
    }

    /// Whether the command reported any error-level message.
    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
