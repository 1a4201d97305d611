use std::sync::Arc;

use crate::config::ServerConfig;
use crate::notifications::Notifier;
use crate::reporting::ErrorReporter;
use crate::services::{BookmarkService, ExperienceService, ProjectService};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub pool: praxis_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Centralized event bus. Notification pushes travel over it.
    pub event_bus: Arc<praxis_events::EventBus>,
    pub notifier: Notifier,
    /// Receives CRITICAL errors when crash reporting is enabled.
    pub reporter: Arc<dyn ErrorReporter>,
}

impl AppState {
    /// Wire up state around an existing pool and event bus.
    pub fn new(
        pool: praxis_db::DbPool,
        config: ServerConfig,
        event_bus: Arc<praxis_events::EventBus>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            notifier: Notifier::new(Arc::clone(&event_bus)),
            event_bus,
            reporter,
        }
    }
}

impl AppState {
    pub fn bookmarks(&self) -> BookmarkService {
        BookmarkService::new(self.pool.clone(), self.notifier.clone())
    }

    pub fn projects(&self) -> ProjectService {
        ProjectService::new(self.pool.clone(), self.notifier.clone())
    }

    pub fn experiences(&self) -> ExperienceService {
        ExperienceService::new(self.pool.clone(), self.notifier.clone())
    }
}
