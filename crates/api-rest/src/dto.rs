//! Request and response bodies for the REST API.
//!
//! DTOs are deliberately separate from core types: timestamps travel as
//! RFC 3339 strings, enums re-derive their schema here, and asset content is
//! base64. Conversions to and from core types live next to the DTOs.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use storyxcel_core::repositories::assets::AssetMetadata;
use storyxcel_core::repositories::friends::{FriendEntry, FriendStatus};
use storyxcel_core::repositories::integrations::{Integration, IntegrationKind};
use storyxcel_core::repositories::projects::{Project, ProjectKind, ProjectSummary};
use storyxcel_core::StoryOverview;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectKindDto {
    Story,
    Production,
    AssetVault,
}

impl From<ProjectKindDto> for ProjectKind {
    fn from(kind: ProjectKindDto) -> Self {
        match kind {
            ProjectKindDto::Story => ProjectKind::Story,
            ProjectKindDto::Production => ProjectKind::Production,
            ProjectKindDto::AssetVault => ProjectKind::AssetVault,
        }
    }
}

impl From<ProjectKind> for ProjectKindDto {
    fn from(kind: ProjectKind) -> Self {
        match kind {
            ProjectKind::Story => ProjectKindDto::Story,
            ProjectKind::Production => ProjectKindDto::Production,
            ProjectKind::AssetVault => ProjectKindDto::AssetVault,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProjectReq {
    pub name: String,
    pub kind: ProjectKindDto,
    pub owner: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProjectReq {
    pub name: String,
    pub kind: ProjectKindDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectRes {
    pub id: String,
    pub name: String,
    pub kind: ProjectKindDto,
    pub owner: String,
    pub collaborators: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub overview: OverviewDto,
    pub script_html: String,
}

impl From<Project> for ProjectRes {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.canonical(),
            name: project.name.into_inner(),
            kind: project.kind.into(),
            owner: project.owner.into_inner(),
            collaborators: project.collaborators,
            created_at: project.created_at.to_rfc3339(),
            updated_at: project.updated_at.to_rfc3339(),
            overview: project.overview.into(),
            script_html: project.script_html,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectSummaryRes {
    pub id: String,
    pub name: String,
    pub kind: ProjectKindDto,
    pub owner: String,
    pub updated_at: String,
}

impl From<ProjectSummary> for ProjectSummaryRes {
    fn from(summary: ProjectSummary) -> Self {
        Self {
            id: summary.id.canonical(),
            name: summary.name,
            kind: summary.kind.into(),
            owner: summary.owner,
            updated_at: summary.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListProjectsRes {
    pub projects: Vec<ProjectSummaryRes>,
}

/// Overview form state as it travels over the wire.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct OverviewDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub runtime: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub sub_genre: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub sub_theme: String,
    #[serde(default)]
    pub central_conflict: String,
    #[serde(default)]
    pub plot_summary: String,
    #[serde(default)]
    pub plot_notes: String,
}

impl From<OverviewDto> for StoryOverview {
    fn from(dto: OverviewDto) -> Self {
        Self {
            title: dto.title,
            project_type: dto.project_type,
            runtime: dto.runtime,
            genre: dto.genre,
            sub_genre: dto.sub_genre,
            theme: dto.theme,
            sub_theme: dto.sub_theme,
            central_conflict: dto.central_conflict,
            plot_summary: dto.plot_summary,
            plot_notes: dto.plot_notes,
        }
    }
}

impl From<StoryOverview> for OverviewDto {
    fn from(overview: StoryOverview) -> Self {
        Self {
            title: overview.title,
            project_type: overview.project_type,
            runtime: overview.runtime,
            genre: overview.genre,
            sub_genre: overview.sub_genre,
            theme: overview.theme,
            sub_theme: overview.sub_theme,
            central_conflict: overview.central_conflict,
            plot_summary: overview.plot_summary,
            plot_notes: overview.plot_notes,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectBeatsReq {
    /// Central-conflict label, e.g. `[Wo]Man vs. Nature`.
    pub conflict: String,
    /// Set after the user has confirmed an overwrite of edited content.
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SelectBeatsRes {
    /// `updated` or `unchanged`.
    pub outcome: String,
    pub document: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentBody {
    pub html: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CollaboratorReq {
    pub username: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FriendRes {
    pub user: String,
    pub status: String,
    pub since: String,
}

impl From<FriendEntry> for FriendRes {
    fn from(entry: FriendEntry) -> Self {
        let status = match entry.status {
            FriendStatus::Requested => "requested",
            FriendStatus::Incoming => "incoming",
            FriendStatus::Accepted => "accepted",
        };
        Self {
            user: entry.user,
            status: status.to_owned(),
            since: entry.since.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListFriendsRes {
    pub friends: Vec<FriendRes>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FriendRequestReq {
    pub to: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StoreAssetReq {
    pub filename: String,
    /// Asset bytes, base64-encoded.
    pub content: String,
}

impl StoreAssetReq {
    pub fn decode_content(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.content)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssetRes {
    pub hash: String,
    pub relative_path: String,
    pub size_bytes: u64,
    pub media_type: Option<String>,
    pub original_filename: String,
    pub stored_at: String,
}

impl From<AssetMetadata> for AssetRes {
    fn from(metadata: AssetMetadata) -> Self {
        Self {
            hash: metadata.hash.as_hex().to_owned(),
            relative_path: metadata.relative_path,
            size_bytes: metadata.size_bytes,
            media_type: metadata.media_type,
            original_filename: metadata.original_filename,
            stored_at: metadata.stored_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListAssetsRes {
    pub assets: Vec<AssetRes>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssetContentRes {
    pub hash: String,
    /// Asset bytes, base64-encoded.
    pub content: String,
}

impl AssetContentRes {
    pub fn new(hash: String, bytes: &[u8]) -> Self {
        Self {
            hash,
            content: BASE64.encode(bytes),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationKindDto {
    Figma,
    Adobe,
}

impl From<IntegrationKindDto> for IntegrationKind {
    fn from(kind: IntegrationKindDto) -> Self {
        match kind {
            IntegrationKindDto::Figma => IntegrationKind::Figma,
            IntegrationKindDto::Adobe => IntegrationKind::Adobe,
        }
    }
}

impl From<IntegrationKind> for IntegrationKindDto {
    fn from(kind: IntegrationKind) -> Self {
        match kind {
            IntegrationKind::Figma => IntegrationKindDto::Figma,
            IntegrationKind::Adobe => IntegrationKindDto::Adobe,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddIntegrationReq {
    pub kind: IntegrationKindDto,
    pub label: String,
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IntegrationRes {
    pub id: String,
    pub kind: IntegrationKindDto,
    pub label: String,
    pub url: String,
    pub added_at: String,
}

impl From<Integration> for IntegrationRes {
    fn from(integration: Integration) -> Self {
        Self {
            id: integration.id.canonical(),
            kind: integration.kind.into(),
            label: integration.label.into_inner(),
            url: integration.url,
            added_at: integration.added_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListIntegrationsRes {
    pub integrations: Vec<IntegrationRes>,
}
