//! In-process events for the praxis backend.
//!
//! - [`EventBus`]: publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the event envelope carried on the bus.
//! - [`NotificationPush`]: a user-facing notification, published as a
//!   `notification.push` event and persisted by a subscriber.

pub mod bus;
pub mod notification;

pub use bus::{EventBus, PlatformEvent};
pub use notification::{NotificationPush, EVENT_NOTIFICATION_PUSH};
