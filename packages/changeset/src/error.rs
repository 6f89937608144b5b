//! Error types for changeset encoding and application

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChangesetError {
    #[error("Malformed changeset at {pos}: {message}")]
    Malformed { pos: usize, message: String },

    #[error("Length mismatch: expected {expected}, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Changeset bank exhausted after {available} characters")]
    BankExhausted { available: usize },

    #[error("Inconsistent delta: {0}")]
    InconsistentDelta(String),

    #[error("Range {start}..{end} is outside a document of {len} characters")]
    OutOfRange { start: usize, end: usize, len: usize },

    #[error("Attribute pool error: {0}")]
    Pool(#[from] serde_json::Error),
}

impl ChangesetError {
    pub fn malformed(pos: usize, message: impl Into<String>) -> Self {
        ChangesetError::Malformed {
            pos,
            message: message.into(),
        }
    }
}

pub type ChangesetResult<T> = Result<T, ChangesetError>;
