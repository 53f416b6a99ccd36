//! # StoryXcel REST API
//!
//! REST surface for StoryXcel.
//!
//! Handles:
//! - HTTP endpoints with axum (projects, documents, regions, friends,
//!   assets, integrations)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON DTOs, CORS, status mapping)
//!
//! All domain behaviour lives in `storyxcel-core`; handlers translate between
//! DTOs and core services and map errors onto HTTP statuses.

#![warn(rust_2018_idioms)]

pub mod dto;
pub mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use storyxcel_core::repositories::friends::FriendService;
use storyxcel_core::repositories::projects::ProjectService;
use storyxcel_core::CoreConfig;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Shared state for all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<CoreConfig>,
    pub projects: ProjectService,
    pub friends: FriendService,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            projects: ProjectService::new(cfg.clone()),
            friends: FriendService::new(cfg.clone()),
            cfg,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_projects,
        handlers::create_project,
        handlers::get_project,
        handlers::update_project,
        handlers::delete_project,
        handlers::get_document,
        handlers::put_document,
        handlers::apply_overview,
        handlers::select_beats,
        handlers::add_collaborator,
        handlers::remove_collaborator,
        handlers::list_friends,
        handlers::request_friend,
        handlers::accept_friend,
        handlers::remove_friend,
        handlers::list_assets,
        handlers::store_asset,
        handlers::get_asset,
        handlers::list_integrations,
        handlers::add_integration,
        handlers::remove_integration,
    ),
    components(schemas(
        dto::HealthRes,
        dto::ProjectKindDto,
        dto::CreateProjectReq,
        dto::UpdateProjectReq,
        dto::ProjectRes,
        dto::ProjectSummaryRes,
        dto::ListProjectsRes,
        dto::OverviewDto,
        dto::SelectBeatsReq,
        dto::SelectBeatsRes,
        dto::DocumentBody,
        dto::CollaboratorReq,
        dto::FriendRes,
        dto::ListFriendsRes,
        dto::FriendRequestReq,
        dto::StoreAssetReq,
        dto::AssetRes,
        dto::ListAssetsRes,
        dto::AssetContentRes,
        dto::IntegrationKindDto,
        dto::AddIntegrationReq,
        dto::IntegrationRes,
        dto::ListIntegrationsRes,
    ))
)]
pub struct ApiDoc;

/// Builds the application router, Swagger UI included.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/projects", get(handlers::list_projects))
        .route("/projects", post(handlers::create_project))
        .route("/projects/:id", get(handlers::get_project))
        .route("/projects/:id", put(handlers::update_project))
        .route("/projects/:id", delete(handlers::delete_project))
        .route("/projects/:id/document", get(handlers::get_document))
        .route("/projects/:id/document", put(handlers::put_document))
        .route("/projects/:id/overview", post(handlers::apply_overview))
        .route("/projects/:id/beats", post(handlers::select_beats))
        .route(
            "/projects/:id/collaborators",
            post(handlers::add_collaborator),
        )
        .route(
            "/projects/:id/collaborators/:username",
            delete(handlers::remove_collaborator),
        )
        .route("/users/:user/friends", get(handlers::list_friends))
        .route("/users/:user/friends", post(handlers::request_friend))
        .route(
            "/users/:user/friends/:other/accept",
            post(handlers::accept_friend),
        )
        .route(
            "/users/:user/friends/:other",
            delete(handlers::remove_friend),
        )
        .route("/projects/:id/assets", get(handlers::list_assets))
        .route("/projects/:id/assets", post(handlers::store_asset))
        .route("/projects/:id/assets/:hash", get(handlers::get_asset))
        .route(
            "/projects/:id/integrations",
            get(handlers::list_integrations),
        )
        .route(
            "/projects/:id/integrations",
            post(handlers::add_integration),
        )
        .route(
            "/projects/:id/integrations/:integration_id",
            delete(handlers::remove_integration),
        )
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
