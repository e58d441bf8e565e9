//! Config-load failure modes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV row {row}: {source}")]
    Csv { row: usize, source: csv::Error },

    #[error("unknown pick_direction {0:?}, expected horizontal, vertical, or on")]
    UnknownPickDirection(String),

    #[error("unknown manual-assignment action {0:?}, expected PICK_UP, DROP_OFF, or DOCK")]
    UnknownAction(String),

    #[error("column count mismatch in {file}: expected {expected}, got {got}")]
    ColumnCount { file: &'static str, expected: usize, got: usize },

    #[error("map config needs a companion JSON with a DATASET key when loading CSV")]
    MissingDataset,
}

pub type ConfigResult<T> = Result<T, ConfigError>;
