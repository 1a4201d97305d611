//! Domain services.
//!
//! Each service owns a pool handle and a [`Notifier`](crate::notifications::Notifier)
//! and takes the caller's [`RequestContext`](praxis_core::context::RequestContext)
//! explicitly on every call. A method authorizes the caller, checks
//! existence, ownership and quotas, performs the write through a repository,
//! then pushes notifications. Notifications are never rolled back with, or
//! allowed to fail, the write.

pub mod bookmark;
pub mod experience;
pub mod project;

pub use bookmark::BookmarkService;
pub use experience::ExperienceService;
pub use project::ProjectService;
