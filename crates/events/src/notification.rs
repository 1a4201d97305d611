//! User-facing notification pushes.
//!
//! A [`NotificationPush`] travels on the bus as the payload of a
//! [`EVENT_NOTIFICATION_PUSH`] event. Publishers build it with
//! [`NotificationPush::into_event`]; subscribers recover it with
//! [`NotificationPush::from_event`].

use praxis_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::bus::PlatformEvent;

pub const EVENT_NOTIFICATION_PUSH: &str = "notification.push";

/// A message addressed to one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPush {
    pub user_id: DbId,
    /// Short category such as `"bookmark"`, `"project"` or `"error"`.
    pub kind: String,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl NotificationPush {
    pub fn new(
        user_id: DbId,
        kind: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            kind: kind.into(),
            title: title.into(),
            message: message.into(),
            data: serde_json::Value::Object(Default::default()),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Wrap this push in a bus event addressed from `actor`.
    pub fn into_event(self, actor: Option<DbId>, correlation_id: Option<String>) -> PlatformEvent {
        let mut event = PlatformEvent::new(EVENT_NOTIFICATION_PUSH)
            .with_source("user", self.user_id)
            .with_correlation_id(correlation_id);
        if let Some(actor) = actor {
            event = event.with_actor(actor);
        }
        // Serializing plain strings, a UUID and a JSON value cannot fail.
        let payload = serde_json::to_value(&self).unwrap_or_default();
        event.with_payload(payload)
    }

    /// Extract a push from a bus event. Returns `None` for other event
    /// types or a payload that does not decode.
    pub fn from_event(event: &PlatformEvent) -> Option<Self> {
        if event.event_type != EVENT_NOTIFICATION_PUSH {
            return None;
        }
        serde_json::from_value(event.payload.clone()).ok()
    }
}
