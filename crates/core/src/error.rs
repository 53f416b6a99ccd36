//! Error type for the StoryXcel core crate.

/// Errors produced by core services.
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("project not found: {0}")]
    ProjectNotFound(String),
    #[error("asset not found: {0}")]
    AssetNotFound(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to create record directory: {0}")]
    RecordDirCreation(std::io::Error),
    #[error("failed to write record file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read record file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to remove record file: {0}")]
    FileRemove(std::io::Error),
    #[error("failed to serialize record: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize record: {0}")]
    Deserialization(serde_json::Error),
    #[error("editor session is no longer running")]
    SessionClosed,
}

pub type StoryResult<T> = std::result::Result<T, StoryError>;
