//! Route definitions for the `/projects` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                      -> list (public)
/// POST   /                      -> create
/// GET    /mine                  -> list_mine
/// GET    /{id}                  -> get_by_id (public)
/// PUT    /{id}                  -> update
/// DELETE /{id}                  -> delete
/// PUT    /{id}/status           -> change_status
/// POST   /{id}/publish          -> publish
/// POST   /{id}/approve          -> approve (admin)
/// POST   /{id}/assign-team      -> assign_team
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/mine", get(project::list_mine))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/status", put(project::change_status))
        .route("/{id}/publish", post(project::publish))
        .route("/{id}/approve", post(project::approve))
        .route("/{id}/assign-team", post(project::assign_team))
}
