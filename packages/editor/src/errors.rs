//! Error types for the editor

use std::path::PathBuf;
use texpad_changeset::ChangesetError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Changeset error: {0}")]
    Changeset(#[from] ChangesetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("No pad for {}", .0.display())]
    PadNotFound(PathBuf),
}
