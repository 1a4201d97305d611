//! Handlers for the `/projects` resource.
//!
//! Listing and fetching are public; everything else needs a caller.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use praxis_core::listing::Paginated;
use praxis_core::types::DbId;
use praxis_db::models::project::{
    AssignTeam, ChangeProjectStatus, CreateProject, Project, UpdateProject,
};

use crate::error::AppResult;
use crate::extract::{ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::middleware::auth::AuthUser;
use crate::middleware::context::Ctx;
use crate::query::ProjectListQuery;
use crate::response::{Created, DataResponse};
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateProject>,
) -> AppResult<Created<Project>> {
    let project = state.projects().create(&auth.ctx, input).await?;
    Ok(Created(project))
}

/// GET /api/v1/projects
pub async fn list(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ProjectListQuery>,
) -> AppResult<Json<DataResponse<Paginated<Project>>>> {
    let page = state.projects().find_all(&ctx, &query).await?;
    Ok(DataResponse::new(page))
}

/// GET /api/v1/projects/mine
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ProjectListQuery>,
) -> AppResult<Json<DataResponse<Paginated<Project>>>> {
    let page = state.projects().find_mine(&auth.ctx, &query).await?;
    Ok(DataResponse::new(page))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    Ctx(ctx): Ctx,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state.projects().find_one(&ctx, id).await?;
    Ok(DataResponse::new(project))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state.projects().update(&auth.ctx, id, input).await?;
    Ok(DataResponse::new(project))
}

/// PUT /api/v1/projects/{id}/status
pub async fn change_status(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
    ValidatedJson(input): ValidatedJson<ChangeProjectStatus>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state
        .projects()
        .change_status(&auth.ctx, id, input.status.trim())
        .await?;
    Ok(DataResponse::new(project))
}

/// POST /api/v1/projects/{id}/publish
pub async fn publish(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state.projects().publish(&auth.ctx, id).await?;
    Ok(DataResponse::new(project))
}

/// POST /api/v1/projects/{id}/approve
pub async fn approve(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state.projects().approve(&auth.ctx, id).await?;
    Ok(DataResponse::new(project))
}

/// POST /api/v1/projects/{id}/assign-team
pub async fn assign_team(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
    ValidatedJson(input): ValidatedJson<AssignTeam>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state
        .projects()
        .assign_team(&auth.ctx, id, input.team_id)
        .await?;
    Ok(DataResponse::new(project))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<StatusCode> {
    state.projects().delete(&auth.ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
