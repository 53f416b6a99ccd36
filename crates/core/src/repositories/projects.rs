//! Project records.
//!
//! Projects are stored as sharded JSON records under
//! `<data_dir>/projects/<s1>/<s2>/<32hex>/project.json`, where s1/s2 are the
//! first four hex characters of the id. The record carries the project
//! metadata, the persisted overview form state, and the story document HTML;
//! project-scoped assets and integrations live alongside it in the same
//! directory.

use crate::config::CoreConfig;
use crate::constants::PROJECT_JSON_FILENAME;
use crate::document::StoryDocument;
use crate::ids::RecordId;
use crate::regions::beats::ConflictArchetype;
use crate::regions::overview::StoryOverview;
use crate::repositories::helpers::{create_unique_record_dir, read_json, write_json};
use crate::sync::{BeatsOutcome, ConfirmOverwrite, EditorSession};
use crate::validation::validate_username;
use crate::{StoryError, StoryResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use storyxcel_types::NonEmptyText;

/// Project category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKind {
    Story,
    Production,
    AssetVault,
}

/// A stored project record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: RecordId,
    pub name: NonEmptyText,
    pub kind: ProjectKind,
    pub owner: NonEmptyText,
    #[serde(default)]
    pub collaborators: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub overview: StoryOverview,
    #[serde(default)]
    pub script_html: String,
}

/// Listing form of a project record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: RecordId,
    pub name: String,
    pub kind: ProjectKind,
    pub owner: String,
    pub updated_at: DateTime<Utc>,
}

/// File-backed project operations.
#[derive(Clone)]
pub struct ProjectService {
    cfg: Arc<CoreConfig>,
}

impl ProjectService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    fn record_path(&self, id: &RecordId) -> PathBuf {
        id.sharded_dir(&self.cfg.projects_dir())
            .join(PROJECT_JSON_FILENAME)
    }

    /// Creates a project with a freshly seeded story document.
    pub fn create(
        &self,
        name: NonEmptyText,
        kind: ProjectKind,
        owner: NonEmptyText,
    ) -> StoryResult<Project> {
        validate_username(owner.as_str())?;
        fs::create_dir_all(self.cfg.projects_dir()).map_err(StoryError::StorageDirCreation)?;

        let (id, dir) = create_unique_record_dir(&self.cfg.projects_dir())?;
        let now = Utc::now();
        let project = Project {
            id,
            name,
            kind,
            owner,
            collaborators: Vec::new(),
            created_at: now,
            updated_at: now,
            overview: StoryOverview::default(),
            script_html: StoryDocument::seeded().into_html(),
        };
        write_json(&dir.join(PROJECT_JSON_FILENAME), &project)?;
        tracing::info!(project = %project.id, "created project");
        Ok(project)
    }

    /// Loads a project record.
    pub fn get(&self, id: &RecordId) -> StoryResult<Project> {
        let path = self.record_path(id);
        if !path.is_file() {
            return Err(StoryError::ProjectNotFound(id.canonical()));
        }
        read_json(&path)
    }

    /// Persists a project record, bumping its update timestamp.
    pub fn save(&self, project: &mut Project) -> StoryResult<()> {
        let path = self.record_path(&project.id);
        if !path.is_file() {
            return Err(StoryError::ProjectNotFound(project.id.canonical()));
        }
        project.updated_at = Utc::now();
        write_json(&path, project)
    }

    /// Deletes a project record and everything stored alongside it.
    pub fn delete(&self, id: &RecordId) -> StoryResult<()> {
        let dir = id.sharded_dir(&self.cfg.projects_dir());
        if !dir.is_dir() {
            return Err(StoryError::ProjectNotFound(id.canonical()));
        }
        fs::remove_dir_all(&dir).map_err(StoryError::FileRemove)?;
        tracing::info!(project = %id, "deleted project");
        Ok(())
    }

    /// Lists all project records.
    ///
    /// Traverses the sharded directory structure and reads each
    /// `project.json`. Records that cannot be parsed are logged and skipped.
    pub fn list(&self) -> Vec<ProjectSummary> {
        let mut summaries = Vec::new();

        let s1_iter = match fs::read_dir(self.cfg.projects_dir()) {
            Ok(it) => it,
            Err(_) => return summaries,
        };
        for s1 in s1_iter.flatten() {
            let s1_path = s1.path();
            if !s1_path.is_dir() {
                continue;
            }

            let s2_iter = match fs::read_dir(&s1_path) {
                Ok(it) => it,
                Err(_) => continue,
            };
            for s2 in s2_iter.flatten() {
                let s2_path = s2.path();
                if !s2_path.is_dir() {
                    continue;
                }

                let id_iter = match fs::read_dir(&s2_path) {
                    Ok(it) => it,
                    Err(_) => continue,
                };
                for id_ent in id_iter.flatten() {
                    let record = id_ent.path().join(PROJECT_JSON_FILENAME);
                    if !record.is_file() {
                        continue;
                    }
                    match read_json::<Project>(&record) {
                        Ok(project) => summaries.push(ProjectSummary {
                            id: project.id,
                            name: project.name.into_inner(),
                            kind: project.kind,
                            owner: project.owner.into_inner(),
                            updated_at: project.updated_at,
                        }),
                        Err(e) => {
                            tracing::warn!(
                                path = %record.display(),
                                error = %e,
                                "skipping unparseable project record"
                            );
                        }
                    }
                }
            }
        }

        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        summaries
    }

    /// Adds a collaborator to a project.
    pub fn add_collaborator(&self, id: &RecordId, username: &str) -> StoryResult<Project> {
        validate_username(username)?;
        let mut project = self.get(id)?;
        if !project.collaborators.iter().any(|c| c == username) {
            project.collaborators.push(username.to_owned());
            self.save(&mut project)?;
        }
        Ok(project)
    }

    /// Removes a collaborator from a project.
    pub fn remove_collaborator(&self, id: &RecordId, username: &str) -> StoryResult<Project> {
        let mut project = self.get(id)?;
        let before = project.collaborators.len();
        project.collaborators.retain(|c| c != username);
        if project.collaborators.len() != before {
            self.save(&mut project)?;
        }
        Ok(project)
    }

    /// Replaces the stored story document HTML.
    pub fn set_document(&self, id: &RecordId, html: String) -> StoryResult<Project> {
        let mut project = self.get(id)?;
        project.script_html = html;
        self.save(&mut project)?;
        Ok(project)
    }

    /// Applies overview form state to the stored document and persists both.
    pub fn apply_overview(
        &self,
        id: &RecordId,
        overview: StoryOverview,
    ) -> StoryResult<Project> {
        let mut project = self.get(id)?;
        let html = std::mem::take(&mut project.script_html);
        let mut session = EditorSession::new(StoryDocument::new(html));
        session.apply_overview(&overview);
        project.script_html = session.into_document().into_html();
        project.overview = overview;
        self.save(&mut project)?;
        Ok(project)
    }

    /// Applies a central-conflict selection to the stored document.
    ///
    /// The document is persisted only when the selection actually wrote; a
    /// declined or no-op selection leaves the record untouched.
    pub async fn select_conflict(
        &self,
        id: &RecordId,
        conflict: ConflictArchetype,
        confirmer: &dyn ConfirmOverwrite,
    ) -> StoryResult<(Project, BeatsOutcome)> {
        let mut project = self.get(id)?;
        let mut session = EditorSession::new(StoryDocument::new(project.script_html.clone()));
        let outcome = session.select_conflict(conflict, confirmer).await;
        if outcome == BeatsOutcome::Updated {
            project.script_html = session.into_document().into_html();
            project.overview.central_conflict = conflict.label().to_owned();
            self.save(&mut project)?;
        }
        Ok((project, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::Preconfirmed;

    fn service() -> (tempfile::TempDir, ProjectService) {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = Arc::new(CoreConfig::new(tmp.path().to_path_buf()).unwrap());
        cfg.ensure_layout().unwrap();
        (tmp, ProjectService::new(cfg))
    }

    fn sample(service: &ProjectService) -> Project {
        service
            .create(
                NonEmptyText::new("Gun Smoke").unwrap(),
                ProjectKind::Story,
                NonEmptyText::new("alice").unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn create_get_round_trip() {
        let (_tmp, service) = service();
        let created = sample(&service);
        let loaded = service.get(&created.id).unwrap();
        assert_eq!(loaded, created);
        assert!(loaded.script_html.contains("Your story begins here"));
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let (_tmp, service) = service();
        let missing = RecordId::generate();
        assert!(matches!(
            service.get(&missing),
            Err(StoryError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn list_skips_unparseable_records() {
        let (_tmp, service) = service();
        let a = sample(&service);
        let b = sample(&service);

        // Corrupt one record on disk.
        let path = b
            .id
            .sharded_dir(&service.cfg.projects_dir())
            .join(PROJECT_JSON_FILENAME);
        fs::write(&path, "{not json").unwrap();

        let listed = service.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, a.id);
    }

    #[test]
    fn delete_removes_the_record() {
        let (_tmp, service) = service();
        let project = sample(&service);
        service.delete(&project.id).unwrap();
        assert!(service.get(&project.id).is_err());
        assert!(service.list().is_empty());
    }

    #[test]
    fn collaborators_add_and_remove() {
        let (_tmp, service) = service();
        let project = sample(&service);
        let updated = service.add_collaborator(&project.id, "bob").unwrap();
        assert_eq!(updated.collaborators, ["bob"]);
        // Adding twice is a no-op.
        let updated = service.add_collaborator(&project.id, "bob").unwrap();
        assert_eq!(updated.collaborators, ["bob"]);
        let updated = service.remove_collaborator(&project.id, "bob").unwrap();
        assert!(updated.collaborators.is_empty());
        assert!(service.add_collaborator(&project.id, "../bad").is_err());
    }

    #[test]
    fn apply_overview_updates_document_and_form_state() {
        let (_tmp, service) = service();
        let project = sample(&service);
        let overview = StoryOverview {
            title: "Gun Smoke".into(),
            genre: "Western".into(),
            ..StoryOverview::default()
        };
        let updated = service.apply_overview(&project.id, overview.clone()).unwrap();
        assert_eq!(updated.overview, overview);
        assert!(updated.script_html.contains("<p>Story Title — Gun Smoke</p>"));

        let loaded = service.get(&project.id).unwrap();
        assert_eq!(loaded.script_html, updated.script_html);
    }

    #[tokio::test]
    async fn select_conflict_persists_only_when_updated() {
        let (_tmp, service) = service();
        let project = sample(&service);

        let (updated, outcome) = service
            .select_conflict(&project.id, ConflictArchetype::Nature, &Preconfirmed(true))
            .await
            .unwrap();
        assert_eq!(outcome, BeatsOutcome::Updated);
        assert!(updated.script_html.contains("[Wo]Man vs. Nature"));

        // Reselecting the untouched region is a silent no-op.
        let stamp_before = service.get(&project.id).unwrap().updated_at;
        let (_, outcome) = service
            .select_conflict(&project.id, ConflictArchetype::Nature, &Preconfirmed(false))
            .await
            .unwrap();
        assert_eq!(outcome, BeatsOutcome::Unchanged);
        assert_eq!(service.get(&project.id).unwrap().updated_at, stamp_before);
    }
}
