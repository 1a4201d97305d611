//! Route definitions for the `/bookmarks` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::bookmark;
use crate::state::AppState;

/// Routes mounted at `/bookmarks`.
///
/// ```text
/// GET    /                      -> list
/// POST   /                      -> create
/// DELETE /bulk                  -> bulk_delete
/// GET    /check/{project_id}    -> check
/// GET    /{id}                  -> get_by_id
/// PUT    /{id}                  -> update
/// DELETE /{id}                  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(bookmark::list).post(bookmark::create))
        .route("/bulk", delete(bookmark::bulk_delete))
        .route("/check/{project_id}", get(bookmark::check))
        .route(
            "/{id}",
            get(bookmark::get_by_id)
                .put(bookmark::update)
                .delete(bookmark::delete),
        )
}
