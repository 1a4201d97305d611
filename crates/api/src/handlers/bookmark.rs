//! Handlers for the `/bookmarks` resource.
//!
//! All endpoints require a student caller.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use praxis_core::listing::Paginated;
use praxis_core::types::DbId;
use praxis_db::models::bookmark::{
    Bookmark, BookmarkWithProject, BulkDeleteBookmarks, CreateBookmark, UpdateBookmark,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::{ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::middleware::auth::AuthUser;
use crate::query::BookmarkListQuery;
use crate::response::{Created, DataResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BookmarkCheck {
    pub bookmarked: bool,
}

#[derive(Debug, Serialize)]
pub struct BulkDeleted {
    pub deleted: u64,
}

/// POST /api/v1/bookmarks
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateBookmark>,
) -> AppResult<Created<Bookmark>> {
    let bookmark = state.bookmarks().create(&auth.ctx, input).await?;
    Ok(Created(bookmark))
}

/// GET /api/v1/bookmarks
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<BookmarkListQuery>,
) -> AppResult<Json<DataResponse<Paginated<BookmarkWithProject>>>> {
    let page = state.bookmarks().find_all(&auth.ctx, &query).await?;
    Ok(DataResponse::new(page))
}

/// GET /api/v1/bookmarks/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<Json<DataResponse<Bookmark>>> {
    let bookmark = state.bookmarks().find_one(&auth.ctx, id).await?;
    Ok(DataResponse::new(bookmark))
}

/// GET /api/v1/bookmarks/check/{project_id}
pub async fn check(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(project_id): ValidatedPath<DbId>,
) -> AppResult<Json<DataResponse<BookmarkCheck>>> {
    let bookmarked = state.bookmarks().is_bookmarked(&auth.ctx, project_id).await?;
    Ok(DataResponse::new(BookmarkCheck { bookmarked }))
}

/// PUT /api/v1/bookmarks/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateBookmark>,
) -> AppResult<Json<DataResponse<Bookmark>>> {
    let bookmark = state.bookmarks().update(&auth.ctx, id, input).await?;
    Ok(DataResponse::new(bookmark))
}

/// DELETE /api/v1/bookmarks/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<DbId>,
) -> AppResult<StatusCode> {
    state.bookmarks().remove(&auth.ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/bookmarks/bulk
///
/// All-or-nothing; responds with the number of bookmarks removed.
pub async fn bulk_delete(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<BulkDeleteBookmarks>,
) -> AppResult<Json<DataResponse<BulkDeleted>>> {
    let deleted = state.bookmarks().bulk_delete(&auth.ctx, &input.ids).await?;
    Ok(DataResponse::new(BulkDeleted { deleted }))
}
