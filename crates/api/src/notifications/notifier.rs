//! Fire-and-forget notification publishing.

use std::sync::Arc;

use praxis_core::context::RequestContext;
use praxis_events::{EventBus, NotificationPush};

/// Cheaply cloneable handle services use to push notifications.
#[derive(Clone)]
pub struct Notifier {
    bus: Arc<EventBus>,
}

impl Notifier {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }

    /// Publish `push` on behalf of the request in `ctx`.
    ///
    /// Delivery is asynchronous and best-effort: the write that triggered
    /// the push has already happened and is not affected by what follows.
    pub fn push(&self, ctx: &RequestContext, push: NotificationPush) {
        tracing::debug!(
            user_id = %push.user_id,
            kind = %push.kind,
            title = %push.title,
            "Publishing notification"
        );
        self.bus
            .publish(push.into_event(ctx.user_id(), ctx.correlation_id.clone()));
    }
}

#[cfg(test)]
mod tests {
    use praxis_core::context::Identity;
    use uuid::Uuid;

    use super::*;

    #[tokio::test]
    async fn push_carries_actor_and_correlation_id() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let notifier = Notifier::new(Arc::clone(&bus));

        let actor = Uuid::new_v4();
        let recipient = Uuid::new_v4();
        let ctx = RequestContext::authenticated(Identity::new(actor, "student"))
            .with_correlation_id("req-7");
        notifier.push(
            &ctx,
            NotificationPush::new(recipient, "bookmark", "Saved to bookmarks", "Saved"),
        );

        let event = rx.recv().await.unwrap();
        assert_eq!(event.actor_user_id, Some(actor));
        assert_eq!(event.correlation_id.as_deref(), Some("req-7"));
        let push = NotificationPush::from_event(&event).unwrap();
        assert_eq!(push.user_id, recipient);
    }

    #[test]
    fn push_without_subscribers_is_silent() {
        let notifier = Notifier::new(Arc::new(EventBus::default()));
        notifier.push(
            &RequestContext::anonymous(),
            NotificationPush::new(Uuid::new_v4(), "error", "Error", "Something failed"),
        );
    }
}
