use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to create cache directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Cache path exists but is not a directory: '{0}'")]
    NotADirectory(PathBuf),

    #[error("Failed to read cache file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to remove cache file '{0}'")]
    Remove(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode cache data from '{0}'")]
    Decode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Cache file '{path}' is corrupt: {reason}")]
    CorruptEntry { path: PathBuf, reason: String },

    #[error("Failed to encode cache data")]
    Encode(#[source] Box<bincode::error::EncodeError>),

    #[error("In-memory cache lock was poisoned")]
    Poisoned,

    // Covers errors joining tokio blocking tasks
    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
