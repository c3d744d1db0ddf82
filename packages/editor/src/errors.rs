//! Error types for the editor

use thiserror::Error;

/// Failure reading or writing persisted undo history
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid history payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("History store unavailable: {0}")]
    Unavailable(String),
}
