//! Persists notification pushes from the event bus.
//!
//! [`NotificationRouter`] subscribes to the bus and writes every
//! `notification.push` event to the `notifications` table. Other events
//! are ignored.

use praxis_db::models::notification::NewNotification;
use praxis_db::repositories::NotificationRepo;
use praxis_db::DbPool;
use praxis_events::{NotificationPush, PlatformEvent};
use tokio::sync::broadcast;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Failed to store notification: {0}")]
    Database(#[from] sqlx::Error),
}

pub struct NotificationRouter {
    pool: DbPool,
}

impl NotificationRouter {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run until the bus closes (i.e. the [`EventBus`](praxis_events::EventBus)
    /// is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.route_event(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            correlation_id = event.correlation_id.as_deref(),
                            "Failed to route event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Store the push carried by `event`, if it is one.
    pub async fn route_event(&self, event: &PlatformEvent) -> Result<(), NotifyError> {
        let Some(push) = NotificationPush::from_event(event) else {
            return Ok(());
        };

        let id = NotificationRepo::create(
            &self.pool,
            &NewNotification {
                user_id: push.user_id,
                kind: &push.kind,
                title: &push.title,
                message: &push.message,
                data: &push.data,
            },
        )
        .await?;

        tracing::debug!(notification_id = %id, user_id = %push.user_id, "Notification stored");
        Ok(())
    }
}
