//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core
//! services. Request handlers never read process-wide environment variables;
//! doing so leads to inconsistent behaviour in multi-threaded runtimes and
//! test harnesses.

use crate::constants::{PROJECTS_DIR_NAME, USERS_DIR_NAME};
use crate::{StoryError, StoryResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig` rooted at `data_dir`.
    ///
    /// The directory must already exist; services create the subdirectories
    /// they need underneath it.
    pub fn new(data_dir: PathBuf) -> StoryResult<Self> {
        if !data_dir.is_dir() {
            return Err(StoryError::InvalidInput(format!(
                "data directory does not exist: {}",
                data_dir.display()
            )));
        }
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn projects_dir(&self) -> PathBuf {
        self.data_dir.join(PROJECTS_DIR_NAME)
    }

    pub fn users_dir(&self) -> PathBuf {
        self.data_dir.join(USERS_DIR_NAME)
    }

    /// Creates the projects and users subdirectories if they are missing.
    pub fn ensure_layout(&self) -> StoryResult<()> {
        fs::create_dir_all(self.projects_dir()).map_err(StoryError::StorageDirCreation)?;
        fs::create_dir_all(self.users_dir()).map_err(StoryError::StorageDirCreation)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_data_dir() {
        let result = CoreConfig::new(PathBuf::from("/definitely/not/a/real/dir"));
        assert!(result.is_err());
    }

    #[test]
    fn ensure_layout_creates_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = CoreConfig::new(tmp.path().to_path_buf()).unwrap();
        cfg.ensure_layout().unwrap();
        assert!(cfg.projects_dir().is_dir());
        assert!(cfg.users_dir().is_dir());
    }
}
