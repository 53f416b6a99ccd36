//! Repository directory utilities.

use crate::ids::RecordId;
use crate::{StoryError, StoryResult};
use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

/// Creates a unique sharded record directory under `base_dir`.
///
/// Allocates a fresh id and creates the corresponding sharded directory,
/// retrying with a different id if the directory already exists (UUID
/// collision or external interference). Retries are bounded.
///
/// # Errors
///
/// Returns [`StoryError::RecordDirCreation`] if directory creation fails or
/// no unique directory could be allocated within the retry budget.
pub(crate) fn create_unique_record_dir(base_dir: &Path) -> StoryResult<(RecordId, PathBuf)> {
    for _attempt in 0..5 {
        let id = RecordId::generate();
        let candidate = id.sharded_dir(base_dir);

        if candidate.exists() {
            continue;
        }

        if let Some(parent) = candidate.parent() {
            fs::create_dir_all(parent).map_err(StoryError::RecordDirCreation)?;
        }

        match fs::create_dir(&candidate) {
            Ok(()) => return Ok((id, candidate)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(StoryError::RecordDirCreation(e)),
        }
    }

    Err(StoryError::RecordDirCreation(io::Error::new(
        ErrorKind::AlreadyExists,
        "could not allocate a unique record directory",
    )))
}

/// Reads and deserializes a JSON record file.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> StoryResult<T> {
    let contents = fs::read_to_string(path).map_err(StoryError::FileRead)?;
    serde_json::from_str(&contents).map_err(StoryError::Deserialization)
}

/// Serializes and writes a JSON record file.
pub(crate) fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> StoryResult<()> {
    let contents = serde_json::to_string_pretty(value).map_err(StoryError::Serialization)?;
    fs::write(path, contents).map_err(StoryError::FileWrite)
}
