use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Content cannot be empty for article records")]
    EmptyArticleContent,
}

#[derive(Error, Debug)]
pub enum InfobaseError {
    #[error("Record not found: {0}")]
    RecordNotFound(u64),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl InfobaseError {
    /// The validation failure behind this error, if that is what it is.
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            InfobaseError::Validation(v) => Some(*v),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, InfobaseError>;

/// Collapses a typed result into a plain pass/fail answer. Failures are
/// logged, never returned.
pub fn succeeded<T>(operation: &str, result: Result<T>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) => {
            log::warn!("{} failed: {}", operation, e);
            false
        }
    }
}

/// Method form of [`succeeded`].
pub trait Outcome {
    fn succeeded(self, operation: &str) -> bool;
}

impl<T> Outcome for Result<T> {
    fn succeeded(self, operation: &str) -> bool {
        succeeded(operation, self)
    }
}
