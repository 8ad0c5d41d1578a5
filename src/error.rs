use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("database may be corrupt (line {line}): {reason}")]
    CorruptDatabase { line: usize, reason: String },

    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("data directory does not exist and could not be created: {0}")]
    DataDir(PathBuf),
}

impl Error {
    pub(crate) fn corrupt(line: usize, reason: impl Into<String>) -> Self {
        Self::CorruptDatabase {
            line,
            reason: reason.into(),
        }
    }
}
