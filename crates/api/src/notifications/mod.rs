//! In-app notifications.
//!
//! Services push through a [`Notifier`], which publishes onto the event bus
//! and never fails the caller. The [`NotificationRouter`] background task
//! persists every push so users can list them later.

pub mod notifier;
pub mod router;

pub use notifier::Notifier;
pub use router::{NotificationRouter, NotifyError};
