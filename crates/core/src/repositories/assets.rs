//! Project-scoped, content-addressed asset storage.
//!
//! Binary assets (boards, artwork, reference images) are stored once per
//! project under `assets/sha256/<ab>/<fullhash>`, addressed by the SHA-256 of
//! their content, with a JSON metadata ledger alongside the project record.
//! Content addressing gives deduplication, integrity checking and
//! deterministic paths for free; files are never modified after creation.

use crate::config::CoreConfig;
use crate::constants::{ASSETS_JSON_FILENAME, ASSET_FILES_DIR_NAME, PROJECT_JSON_FILENAME};
use crate::fingerprint::Fingerprint;
use crate::ids::RecordId;
use crate::repositories::helpers::{read_json, write_json};
use crate::{StoryError, StoryResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Metadata for one stored asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    /// Hex SHA-256 of the asset content; also its storage address.
    pub hash: Fingerprint,
    /// Path relative to the project directory where the bytes live.
    pub relative_path: String,
    /// Size of the asset in bytes.
    pub size_bytes: u64,
    /// Best-effort detected media type; not authoritative.
    pub media_type: Option<String>,
    /// Filename the asset was uploaded under.
    pub original_filename: String,
    /// When the asset was stored.
    pub stored_at: DateTime<Utc>,
}

/// Content-addressed asset operations for one project.
#[derive(Debug)]
pub struct AssetService {
    project_dir: PathBuf,
    project_id: RecordId,
}

impl AssetService {
    /// Creates a service scoped to an existing project.
    ///
    /// # Errors
    ///
    /// Returns [`StoryError::ProjectNotFound`] if the project record does not
    /// exist.
    pub fn new(cfg: Arc<CoreConfig>, project_id: RecordId) -> StoryResult<Self> {
        let project_dir = project_id.sharded_dir(&cfg.projects_dir());
        if !project_dir.join(PROJECT_JSON_FILENAME).is_file() {
            return Err(StoryError::ProjectNotFound(project_id.canonical()));
        }
        Ok(Self {
            project_dir,
            project_id,
        })
    }

    fn ledger_path(&self) -> PathBuf {
        self.project_dir.join(ASSETS_JSON_FILENAME)
    }

    fn blob_path(&self, hash: &Fingerprint) -> PathBuf {
        let hex = hash.as_hex();
        self.project_dir
            .join(ASSET_FILES_DIR_NAME)
            .join("sha256")
            .join(&hex[0..2])
            .join(hex)
    }

    fn load_ledger(&self) -> StoryResult<Vec<AssetMetadata>> {
        let path = self.ledger_path();
        if !path.is_file() {
            return Ok(Vec::new());
        }
        read_json(&path)
    }

    /// Stores an asset, deduplicating by content hash.
    ///
    /// Storing bytes that already exist returns the existing metadata entry
    /// unchanged.
    pub fn store(&self, bytes: &[u8], original_filename: &str) -> StoryResult<AssetMetadata> {
        let hash = Fingerprint::of_bytes(bytes);
        let mut ledger = self.load_ledger()?;
        if let Some(existing) = ledger.iter().find(|m| m.hash == hash) {
            return Ok(existing.clone());
        }

        let blob = self.blob_path(&hash);
        if let Some(parent) = blob.parent() {
            fs::create_dir_all(parent).map_err(StoryError::StorageDirCreation)?;
        }
        fs::write(&blob, bytes).map_err(StoryError::FileWrite)?;

        let relative_path = format!(
            "{ASSET_FILES_DIR_NAME}/sha256/{}/{}",
            &hash.as_hex()[0..2],
            hash.as_hex()
        );
        let metadata = AssetMetadata {
            hash,
            relative_path,
            size_bytes: bytes.len() as u64,
            media_type: infer::get(bytes).map(|kind| kind.mime_type().to_owned()),
            original_filename: original_filename.to_owned(),
            stored_at: Utc::now(),
        };
        ledger.push(metadata.clone());
        write_json(&self.ledger_path(), &ledger)?;
        tracing::info!(project = %self.project_id, hash = %metadata.hash, "stored asset");
        Ok(metadata)
    }

    /// Lists all stored assets for the project.
    pub fn list(&self) -> StoryResult<Vec<AssetMetadata>> {
        self.load_ledger()
    }

    /// Reads an asset's bytes by content hash, verifying integrity.
    ///
    /// # Errors
    ///
    /// Returns [`StoryError::AssetNotFound`] if no such asset exists, or
    /// [`StoryError::InvalidInput`] if the stored bytes no longer match their
    /// address.
    pub fn read(&self, hash: &Fingerprint) -> StoryResult<Vec<u8>> {
        let blob = self.blob_path(hash);
        if !blob.is_file() {
            return Err(StoryError::AssetNotFound(hash.as_hex().to_owned()));
        }
        let bytes = fs::read(&blob).map_err(StoryError::FileRead)?;
        if &Fingerprint::of_bytes(&bytes) != hash {
            return Err(StoryError::InvalidInput(format!(
                "asset {} failed integrity verification",
                hash.as_hex()
            )));
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::projects::{ProjectKind, ProjectService};
    use storyxcel_types::NonEmptyText;

    fn service() -> (tempfile::TempDir, Arc<CoreConfig>, RecordId) {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = Arc::new(CoreConfig::new(tmp.path().to_path_buf()).unwrap());
        cfg.ensure_layout().unwrap();
        let project = ProjectService::new(cfg.clone())
            .create(
                NonEmptyText::new("Gun Smoke").unwrap(),
                ProjectKind::Story,
                NonEmptyText::new("alice").unwrap(),
            )
            .unwrap();
        (tmp, cfg, project.id)
    }

    #[test]
    fn requires_existing_project() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = Arc::new(CoreConfig::new(tmp.path().to_path_buf()).unwrap());
        cfg.ensure_layout().unwrap();
        assert!(AssetService::new(cfg, RecordId::generate()).is_err());
    }

    #[test]
    fn store_and_read_round_trip() {
        let (_tmp, cfg, project_id) = service();
        let assets = AssetService::new(cfg, project_id).unwrap();

        let bytes = b"storyboard frame one";
        let metadata = assets.store(bytes, "frame-01.txt").unwrap();
        assert_eq!(metadata.size_bytes, bytes.len() as u64);
        assert_eq!(metadata.hash, Fingerprint::of_bytes(bytes));

        let back = assets.read(&metadata.hash).unwrap();
        assert_eq!(back, bytes);
    }

    #[test]
    fn identical_content_is_stored_once() {
        let (_tmp, cfg, project_id) = service();
        let assets = AssetService::new(cfg, project_id).unwrap();

        let first = assets.store(b"same bytes", "a.bin").unwrap();
        let second = assets.store(b"same bytes", "b.bin").unwrap();
        assert_eq!(first, second);
        assert_eq!(assets.list().unwrap().len(), 1);
    }

    #[test]
    fn detects_png_media_type() {
        let (_tmp, cfg, project_id) = service();
        let assets = AssetService::new(cfg, project_id).unwrap();
        let png_header = [
            0x89u8, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d,
        ];
        let metadata = assets.store(&png_header, "cover.png").unwrap();
        assert_eq!(metadata.media_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn read_unknown_hash_is_not_found() {
        let (_tmp, cfg, project_id) = service();
        let assets = AssetService::new(cfg, project_id).unwrap();
        let missing = Fingerprint::of_bytes(b"never stored");
        assert!(matches!(
            assets.read(&missing),
            Err(StoryError::AssetNotFound(_))
        ));
    }

    #[test]
    fn read_detects_tampered_bytes() {
        let (_tmp, cfg, project_id) = service();
        let assets = AssetService::new(cfg, project_id).unwrap();
        let metadata = assets.store(b"original", "o.bin").unwrap();
        let blob = assets.blob_path(&metadata.hash);
        fs::write(&blob, b"tampered").unwrap();
        assert!(assets.read(&metadata.hash).is_err());
    }
}
