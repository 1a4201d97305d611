//! Handlers for the `/experiences` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use praxis_core::listing::Paginated;
use praxis_core::types::DbId;
use praxis_db::models::experience::{CreateExperience, Experience, UpdateExperience};

use crate::error::AppResult;
use crate::extract::{ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::middleware::auth::AuthUser;
use crate::query::ExperienceListQuery;
use crate::response::{Created, DataResponse};
use crate::state::AppState;

/// POST /api/v1/experiences
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateExperience>,
) -> AppResult<Created<Experience>> {
    let experience = state.experiences().create(&auth.ctx, input).await?;
    Ok(Created(experience))
}

/// GET /api/v1/experiences
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ExperienceListQuery>,
) -> AppResult<Json<DataResponse<Paginated<Experience>>>> {
    let page = state.experiences().find_all(&auth.ctx, &query).await?;
    Ok(DataResponse::new(page))
}

/// GET /api/v1/experiences/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<Json<DataResponse<Experience>>> {
    let experience = state.experiences().find_one(&auth.ctx, id).await?;
    Ok(DataResponse::new(experience))
}

/// PUT /api/v1/experiences/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateExperience>,
) -> AppResult<Json<DataResponse<Experience>>> {
    let experience = state.experiences().update(&auth.ctx, id, input).await?;
    Ok(DataResponse::new(experience))
}

/// POST /api/v1/experiences/{id}/publish
pub async fn publish(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<Json<DataResponse<Experience>>> {
    let experience = state.experiences().publish(&auth.ctx, id).await?;
    Ok(DataResponse::new(experience))
}

/// POST /api/v1/experiences/{id}/unpublish
pub async fn unpublish(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<Json<DataResponse<Experience>>> {
    let experience = state.experiences().unpublish(&auth.ctx, id).await?;
    Ok(DataResponse::new(experience))
}

/// POST /api/v1/experiences/{id}/archive
pub async fn archive(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<Json<DataResponse<Experience>>> {
    let experience = state.experiences().archive(&auth.ctx, id).await?;
    Ok(DataResponse::new(experience))
}

/// POST /api/v1/experiences/{id}/unarchive
pub async fn unarchive(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<Json<DataResponse<Experience>>> {
    let experience = state.experiences().unarchive(&auth.ctx, id).await?;
    Ok(DataResponse::new(experience))
}

/// DELETE /api/v1/experiences/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<StatusCode> {
    state.experiences().delete(&auth.ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
