//! Errors for result and exchange-format I/O.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed {file}: {reason}")]
    Malformed { file: &'static str, reason: String },
}

pub type IoResult<T> = Result<T, IoError>;
