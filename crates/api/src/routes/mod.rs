pub mod bookmark;
pub mod experience;
pub mod health;
pub mod notification;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /bookmarks                           list, create
/// /bookmarks/bulk                      bulk delete (DELETE, body { ids })
/// /bookmarks/check/{project_id}        is bookmarked (GET)
/// /bookmarks/{id}                      get, update, delete
///
/// /projects                            list (public), create
/// /projects/mine                       caller's projects (GET)
/// /projects/{id}                       get (public), update, delete
/// /projects/{id}/status                change status (PUT)
/// /projects/{id}/publish               publish (POST)
/// /projects/{id}/approve               approve (POST, admin)
/// /projects/{id}/assign-team           assign team (POST)
///
/// /experiences                         list, create
/// /experiences/{id}                    get, update, delete
/// /experiences/{id}/publish            publish (POST)
/// /experiences/{id}/archive            archive (POST)
/// /experiences/{id}/unarchive          unarchive (POST)
///
/// /notifications                       list (?unread_only, page, limit)
/// /notifications/read-all              mark all read (POST)
/// /notifications/unread-count          unread count (GET)
/// /notifications/{id}/read             mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Student bookmarks.
        .nest("/bookmarks", bookmark::router())
        // Project catalogue and lifecycle.
        .nest("/projects", project::router())
        // Student experiences.
        .nest("/experiences", experience::router())
        // In-app notifications.
        .nest("/notifications", notification::router())
}
