//! Error types for tether

use thiserror::Error;

/// Result type alias
pub type TetherResult<T> = Result<T, TetherError>;

/// Main error type
#[derive(Error, Debug)]
pub enum TetherError {
    #[error("file {0} is not tracked")]
    NotTracked(String),

    #[error("file {path} is already tracked in source {source_name}")]
    AlreadyTracked { path: String, source_name: String },

    #[error("source {0} does not support pushing")]
    ReadOnlySource(String),

    #[error("entry not found: {0}")]
    NotFound(String),

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("aborted")]
    Aborted,

    #[error("sync finished with {0} failed entries")]
    SyncIncomplete(usize),
}

impl TetherError {
    /// True for conditions caused by how the command was invoked rather
    /// than by a failed transfer.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            TetherError::NotTracked(_)
                | TetherError::AlreadyTracked { .. }
                | TetherError::ReadOnlySource(_)
                | TetherError::InvalidPath(_)
                | TetherError::Config(_)
        )
    }
}
