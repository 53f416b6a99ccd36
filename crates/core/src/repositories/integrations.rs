//! External creative-tool integrations.
//!
//! A project can link out to resources in third-party tools (Figma boards,
//! Adobe documents). Each link is a small record in `integrations.json`
//! inside the project directory. The core stores and lists the links;
//! talking to the external services is the frontend's business.

use crate::config::CoreConfig;
use crate::constants::{INTEGRATIONS_JSON_FILENAME, PROJECT_JSON_FILENAME};
use crate::ids::RecordId;
use crate::repositories::helpers::{read_json, write_json};
use crate::validation::validate_integration_url;
use crate::{StoryError, StoryResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use storyxcel_types::NonEmptyText;

/// Supported external tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationKind {
    Figma,
    Adobe,
}

/// One external-tool link attached to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    pub id: RecordId,
    pub kind: IntegrationKind,
    pub label: NonEmptyText,
    pub url: String,
    pub added_at: DateTime<Utc>,
}

/// File-backed integration records for one project.
#[derive(Debug)]
pub struct IntegrationService {
    project_dir: PathBuf,
}

impl IntegrationService {
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
        Ok(Self { project_dir })
    }

    fn records_path(&self) -> PathBuf {
        self.project_dir.join(INTEGRATIONS_JSON_FILENAME)
    }

    fn load(&self) -> StoryResult<Vec<Integration>> {
        let path = self.records_path();
        if !path.is_file() {
            return Ok(Vec::new());
        }
        read_json(&path)
    }

    /// Adds a new integration link.
    pub fn add(
        &self,
        kind: IntegrationKind,
        label: NonEmptyText,
        url: String,
    ) -> StoryResult<Integration> {
        validate_integration_url(&url)?;
        let integration = Integration {
            id: RecordId::generate(),
            kind,
            label,
            url,
            added_at: Utc::now(),
        };
        let mut records = self.load()?;
        records.push(integration.clone());
        write_json(&self.records_path(), &records)?;
        Ok(integration)
    }

    /// Lists all integration links for the project.
    pub fn list(&self) -> StoryResult<Vec<Integration>> {
        self.load()
    }

    /// Removes an integration link by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoryError::InvalidInput`] if no record with that id exists.
    pub fn remove(&self, id: &RecordId) -> StoryResult<()> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            return Err(StoryError::InvalidInput(format!(
                "no integration with id {id}"
            )));
        }
        write_json(&self.records_path(), &records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::projects::{ProjectKind, ProjectService};

    fn service() -> (tempfile::TempDir, IntegrationService) {
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
        let integrations = IntegrationService::new(cfg, project.id).unwrap();
        (tmp, integrations)
    }

    #[test]
    fn add_list_remove_round_trip() {
        let (_tmp, integrations) = service();
        let added = integrations
            .add(
                IntegrationKind::Figma,
                NonEmptyText::new("Storyboard").unwrap(),
                "https://www.figma.com/file/abc123/Storyboard".into(),
            )
            .unwrap();

        let listed = integrations.list().unwrap();
        assert_eq!(listed, [added.clone()]);

        integrations.remove(&added.id).unwrap();
        assert!(integrations.list().unwrap().is_empty());
    }

    #[test]
    fn rejects_invalid_urls() {
        let (_tmp, integrations) = service();
        let result = integrations.add(
            IntegrationKind::Adobe,
            NonEmptyText::new("Comp").unwrap(),
            "http://insecure.example.com".into(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn remove_unknown_id_fails() {
        let (_tmp, integrations) = service();
        assert!(integrations.remove(&RecordId::generate()).is_err());
    }
}
