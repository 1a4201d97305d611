//! Route definitions for the `/experiences` resource.
//!
//! All endpoints require a student caller.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::experience;
use crate::state::AppState;

/// Routes mounted at `/experiences`.
///
/// ```text
/// GET    /                      -> list
/// POST   /                      -> create
/// GET    /{id}                  -> get_by_id
/// PUT    /{id}                  -> update
/// DELETE /{id}                  -> delete
/// POST   /{id}/publish          -> publish
/// POST   /{id}/unpublish        -> unpublish
/// POST   /{id}/archive          -> archive
/// POST   /{id}/unarchive        -> unarchive
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(experience::list).post(experience::create))
        .route(
            "/{id}",
            get(experience::get_by_id)
                .put(experience::update)
                .delete(experience::delete),
        )
        .route("/{id}/publish", post(experience::publish))
        .route("/{id}/unpublish", post(experience::unpublish))
        .route("/{id}/archive", post(experience::archive))
        .route("/{id}/unarchive", post(experience::unarchive))
}
