use std::io;
use std::path::PathBuf;

/// Unified engine error.
/// - Snapshot problems below the root never surface here: they degrade to
///   zero values or an absent previous window.
/// - Only the durable write and a malformed root abort a call.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// I/O failure while writing or renaming the state image.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// State tree could not be encoded.
    #[error("state serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Snapshot root is not a mapping, so no leaf can be named.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

pub type Result<T> = std::result::Result<T, StateError>;

pub(crate) fn io_error(path: impl Into<PathBuf>, err: io::Error) -> StateError {
    StateError::Io {
        path: path.into(),
        source: err,
    }
}
