//! REST request handlers.

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
};
use storyxcel_core::repositories::assets::AssetService;
use storyxcel_core::repositories::integrations::IntegrationService;
use storyxcel_core::{
    BeatsOutcome, ConflictArchetype, Fingerprint, Preconfirmed, RecordId, StoryError,
};
use storyxcel_types::NonEmptyText;

use crate::dto::*;
use crate::AppState;

type HandlerError = (StatusCode, &'static str);

/// Maps a core error onto an HTTP status, logging server-side failures.
fn error_response(context: &'static str, e: StoryError) -> HandlerError {
    match &e {
        StoryError::ProjectNotFound(_) | StoryError::AssetNotFound(_) => {
            (StatusCode::NOT_FOUND, "Not found")
        }
        StoryError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
        _ => {
            tracing::error!("{context} error: {e:?}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

fn parse_id(raw: &str) -> Result<RecordId, HandlerError> {
    RecordId::parse(raw).map_err(|_| (StatusCode::BAD_REQUEST, "Invalid record id"))
}

fn parse_text(raw: &str, message: &'static str) -> Result<NonEmptyText, HandlerError> {
    NonEmptyText::new(raw).map_err(|_| (StatusCode::BAD_REQUEST, message))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "StoryXcel REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/projects",
    responses(
        (status = 200, description = "List of projects", body = ListProjectsRes)
    )
)]
#[axum::debug_handler]
pub async fn list_projects(State(state): State<AppState>) -> Json<ListProjectsRes> {
    let projects = state.projects.list().into_iter().map(Into::into).collect();
    Json(ListProjectsRes { projects })
}

#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectReq,
    responses(
        (status = 201, description = "Project created", body = ProjectRes),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
#[axum::debug_handler]
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectReq>,
) -> Result<(StatusCode, Json<ProjectRes>), HandlerError> {
    let name = parse_text(&req.name, "Project name cannot be empty")?;
    let owner = parse_text(&req.owner, "Owner cannot be empty")?;
    let project = state
        .projects
        .create(name, req.kind.into(), owner)
        .map_err(|e| error_response("Create project", e))?;
    Ok((StatusCode::CREATED, Json(project.into())))
}

#[utoipa::path(
    get,
    path = "/projects/{id}",
    responses(
        (status = 200, description = "Project retrieved", body = ProjectRes),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn get_project(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<ProjectRes>, HandlerError> {
    let id = parse_id(&id)?;
    let project = state
        .projects
        .get(&id)
        .map_err(|e| error_response("Get project", e))?;
    Ok(Json(project.into()))
}

#[utoipa::path(
    put,
    path = "/projects/{id}",
    request_body = UpdateProjectReq,
    responses(
        (status = 200, description = "Project updated", body = ProjectRes),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn update_project(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<UpdateProjectReq>,
) -> Result<Json<ProjectRes>, HandlerError> {
    let id = parse_id(&id)?;
    let mut project = state
        .projects
        .get(&id)
        .map_err(|e| error_response("Update project", e))?;
    project.name = parse_text(&req.name, "Project name cannot be empty")?;
    project.kind = req.kind.into();
    state
        .projects
        .save(&mut project)
        .map_err(|e| error_response("Update project", e))?;
    Ok(Json(project.into()))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}",
    responses(
        (status = 204, description = "Project deleted"),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_project(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<StatusCode, HandlerError> {
    let id = parse_id(&id)?;
    state
        .projects
        .delete(&id)
        .map_err(|e| error_response("Delete project", e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/projects/{id}/document",
    responses(
        (status = 200, description = "Story document", body = DocumentBody),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn get_document(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<DocumentBody>, HandlerError> {
    let id = parse_id(&id)?;
    let project = state
        .projects
        .get(&id)
        .map_err(|e| error_response("Get document", e))?;
    Ok(Json(DocumentBody {
        html: project.script_html,
    }))
}

#[utoipa::path(
    put,
    path = "/projects/{id}/document",
    request_body = DocumentBody,
    responses(
        (status = 200, description = "Story document replaced", body = DocumentBody),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn put_document(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<DocumentBody>,
) -> Result<Json<DocumentBody>, HandlerError> {
    let id = parse_id(&id)?;
    let project = state
        .projects
        .set_document(&id, req.html)
        .map_err(|e| error_response("Put document", e))?;
    Ok(Json(DocumentBody {
        html: project.script_html,
    }))
}

/// Applies overview form state to the project's stored document.
///
/// The client debounces keystrokes; by the time a request lands here it is
/// applied immediately.
#[utoipa::path(
    post,
    path = "/projects/{id}/overview",
    request_body = OverviewDto,
    responses(
        (status = 200, description = "Overview region rewritten", body = ProjectRes),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn apply_overview(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<OverviewDto>,
) -> Result<Json<ProjectRes>, HandlerError> {
    let id = parse_id(&id)?;
    let project = state
        .projects
        .apply_overview(&id, req.into())
        .map_err(|e| error_response("Apply overview", e))?;
    Ok(Json(project.into()))
}

/// Applies a central-conflict selection to the project's beats region.
///
/// When the current region was hand-edited (or its provenance cannot be
/// verified) and `confirm` is false, the request is rejected with `409
/// Conflict`; the client re-submits with `confirm: true` after asking the
/// user.
#[utoipa::path(
    post,
    path = "/projects/{id}/beats",
    request_body = SelectBeatsReq,
    responses(
        (status = 200, description = "Beats selection applied", body = SelectBeatsRes),
        (status = 400, description = "Unknown conflict label"),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Region edited; confirmation required")
    )
)]
#[axum::debug_handler]
pub async fn select_beats(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<SelectBeatsReq>,
) -> Result<Json<SelectBeatsRes>, HandlerError> {
    let id = parse_id(&id)?;
    let conflict = ConflictArchetype::parse(&req.conflict)
        .ok_or((StatusCode::BAD_REQUEST, "Unknown conflict label"))?;

    let (project, outcome) = state
        .projects
        .select_conflict(&id, conflict, &Preconfirmed(req.confirm))
        .await
        .map_err(|e| error_response("Select beats", e))?;

    let outcome = match outcome {
        BeatsOutcome::Updated => "updated",
        BeatsOutcome::Unchanged => "unchanged",
        BeatsOutcome::Declined => {
            return Err((
                StatusCode::CONFLICT,
                "Beats region was edited; resubmit with confirm=true to overwrite",
            ))
        }
    };
    Ok(Json(SelectBeatsRes {
        outcome: outcome.to_owned(),
        document: project.script_html,
    }))
}

#[utoipa::path(
    post,
    path = "/projects/{id}/collaborators",
    request_body = CollaboratorReq,
    responses(
        (status = 200, description = "Collaborator added", body = ProjectRes),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn add_collaborator(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<CollaboratorReq>,
) -> Result<Json<ProjectRes>, HandlerError> {
    let id = parse_id(&id)?;
    let project = state
        .projects
        .add_collaborator(&id, &req.username)
        .map_err(|e| error_response("Add collaborator", e))?;
    Ok(Json(project.into()))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}/collaborators/{username}",
    responses(
        (status = 200, description = "Collaborator removed", body = ProjectRes),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn remove_collaborator(
    State(state): State<AppState>,
    AxumPath((id, username)): AxumPath<(String, String)>,
) -> Result<Json<ProjectRes>, HandlerError> {
    let id = parse_id(&id)?;
    let project = state
        .projects
        .remove_collaborator(&id, &username)
        .map_err(|e| error_response("Remove collaborator", e))?;
    Ok(Json(project.into()))
}

#[utoipa::path(
    get,
    path = "/users/{user}/friends",
    responses(
        (status = 200, description = "Friend list", body = ListFriendsRes),
        (status = 400, description = "Invalid username")
    )
)]
#[axum::debug_handler]
pub async fn list_friends(
    State(state): State<AppState>,
    AxumPath(user): AxumPath<String>,
) -> Result<Json<ListFriendsRes>, HandlerError> {
    let friends = state
        .friends
        .list(&user)
        .map_err(|e| error_response("List friends", e))?;
    Ok(Json(ListFriendsRes {
        friends: friends.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/users/{user}/friends",
    request_body = FriendRequestReq,
    responses(
        (status = 201, description = "Friend request sent"),
        (status = 400, description = "Invalid username")
    )
)]
#[axum::debug_handler]
pub async fn request_friend(
    State(state): State<AppState>,
    AxumPath(user): AxumPath<String>,
    Json(req): Json<FriendRequestReq>,
) -> Result<StatusCode, HandlerError> {
    state
        .friends
        .request(&user, &req.to)
        .map_err(|e| error_response("Request friend", e))?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    post,
    path = "/users/{user}/friends/{other}/accept",
    responses(
        (status = 200, description = "Friend request accepted"),
        (status = 400, description = "No pending request")
    )
)]
#[axum::debug_handler]
pub async fn accept_friend(
    State(state): State<AppState>,
    AxumPath((user, other)): AxumPath<(String, String)>,
) -> Result<StatusCode, HandlerError> {
    state
        .friends
        .accept(&user, &other)
        .map_err(|e| error_response("Accept friend", e))?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    delete,
    path = "/users/{user}/friends/{other}",
    responses(
        (status = 204, description = "Friendship removed"),
        (status = 400, description = "Invalid username")
    )
)]
#[axum::debug_handler]
pub async fn remove_friend(
    State(state): State<AppState>,
    AxumPath((user, other)): AxumPath<(String, String)>,
) -> Result<StatusCode, HandlerError> {
    state
        .friends
        .remove(&user, &other)
        .map_err(|e| error_response("Remove friend", e))?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/projects/{id}/assets",
    responses(
        (status = 200, description = "Asset list", body = ListAssetsRes),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn list_assets(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<ListAssetsRes>, HandlerError> {
    let id = parse_id(&id)?;
    let assets = AssetService::new(state.cfg.clone(), id)
        .and_then(|service| service.list())
        .map_err(|e| error_response("List assets", e))?;
    Ok(Json(ListAssetsRes {
        assets: assets.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/projects/{id}/assets",
    request_body = StoreAssetReq,
    responses(
        (status = 201, description = "Asset stored", body = AssetRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn store_asset(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<StoreAssetReq>,
) -> Result<(StatusCode, Json<AssetRes>), HandlerError> {
    let id = parse_id(&id)?;
    let bytes = req
        .decode_content()
        .map_err(|_| (StatusCode::BAD_REQUEST, "Asset content is not valid base64"))?;
    let metadata = AssetService::new(state.cfg.clone(), id)
        .and_then(|service| service.store(&bytes, &req.filename))
        .map_err(|e| error_response("Store asset", e))?;
    Ok((StatusCode::CREATED, Json(metadata.into())))
}

#[utoipa::path(
    get,
    path = "/projects/{id}/assets/{hash}",
    responses(
        (status = 200, description = "Asset content", body = AssetContentRes),
        (status = 404, description = "Asset not found")
    )
)]
#[axum::debug_handler]
pub async fn get_asset(
    State(state): State<AppState>,
    AxumPath((id, hash)): AxumPath<(String, String)>,
) -> Result<Json<AssetContentRes>, HandlerError> {
    let id = parse_id(&id)?;
    let hash =
        Fingerprint::parse(&hash).ok_or((StatusCode::BAD_REQUEST, "Invalid asset hash"))?;
    let bytes = AssetService::new(state.cfg.clone(), id)
        .and_then(|service| service.read(&hash))
        .map_err(|e| error_response("Get asset", e))?;
    Ok(Json(AssetContentRes::new(hash.as_hex().to_owned(), &bytes)))
}

#[utoipa::path(
    get,
    path = "/projects/{id}/integrations",
    responses(
        (status = 200, description = "Integration list", body = ListIntegrationsRes),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn list_integrations(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<ListIntegrationsRes>, HandlerError> {
    let id = parse_id(&id)?;
    let integrations = IntegrationService::new(state.cfg.clone(), id)
        .and_then(|service| service.list())
        .map_err(|e| error_response("List integrations", e))?;
    Ok(Json(ListIntegrationsRes {
        integrations: integrations.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/projects/{id}/integrations",
    request_body = AddIntegrationReq,
    responses(
        (status = 201, description = "Integration added", body = IntegrationRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn add_integration(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<AddIntegrationReq>,
) -> Result<(StatusCode, Json<IntegrationRes>), HandlerError> {
    let id = parse_id(&id)?;
    let label = parse_text(&req.label, "Integration label cannot be empty")?;
    let integration = IntegrationService::new(state.cfg.clone(), id)
        .and_then(|service| service.add(req.kind.into(), label, req.url))
        .map_err(|e| error_response("Add integration", e))?;
    Ok((StatusCode::CREATED, Json(integration.into())))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}/integrations/{integration_id}",
    responses(
        (status = 204, description = "Integration removed"),
        (status = 400, description = "Unknown integration"),
        (status = 404, description = "Project not found")
    )
)]
#[axum::debug_handler]
pub async fn remove_integration(
    State(state): State<AppState>,
    AxumPath((id, integration_id)): AxumPath<(String, String)>,
) -> Result<StatusCode, HandlerError> {
    let id = parse_id(&id)?;
    let integration_id = parse_id(&integration_id)?;
    IntegrationService::new(state.cfg.clone(), id)
        .and_then(|service| service.remove(&integration_id))
        .map_err(|e| error_response("Remove integration", e))?;
    Ok(StatusCode::NO_CONTENT)
}
