//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod bookmark_repo;
pub mod experience_repo;
pub mod notification_repo;
pub mod project_repo;

pub use bookmark_repo::BookmarkRepo;
pub use experience_repo::ExperienceRepo;
pub use notification_repo::NotificationRepo;
pub use project_repo::ProjectRepo;
