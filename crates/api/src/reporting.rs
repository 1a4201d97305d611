//! Crash reporting for critical errors.
//!
//! The error filter hands every CRITICAL error to an [`ErrorReporter`] on a
//! spawned task. A failed report is logged and otherwise ignored; there are
//! no retries.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use praxis_core::error::{ErrorCode, ErrorContext, Severity};
use praxis_core::types::Timestamp;
use serde::Serialize;

/// HTTP timeout for a single report.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// What gets sent to the crash tracker.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
    pub severity: Severity,
    pub context: Option<ErrorContext>,
    pub path: Option<String>,
    pub method: Option<String>,
    pub correlation_id: Option<String>,
    pub timestamp: Timestamp,
    /// Debug rendering of the original error.
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Crash report request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Crash report endpoint returned HTTP {0}")]
    HttpStatus(u16),
}

#[async_trait]
pub trait ErrorReporter: Send + Sync {
    async fn report(&self, report: &ErrorReport) -> Result<(), ReportError>;
}

// ---------------------------------------------------------------------------
// WebhookReporter
// ---------------------------------------------------------------------------

/// POSTs each report as JSON to a fixed URL.
pub struct WebhookReporter {
    client: reqwest::Client,
    url: String,
}

impl WebhookReporter {
    pub fn new(url: impl Into<String>) -> Result<Self, ReportError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ErrorReporter for WebhookReporter {
    async fn report(&self, report: &ErrorReport) -> Result<(), ReportError> {
        let response = self.client.post(&self.url).json(report).send().await?;
        if !response.status().is_success() {
            return Err(ReportError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TracingReporter
// ---------------------------------------------------------------------------

/// Writes reports to the log. Used when no crash tracker is configured.
pub struct TracingReporter;

#[async_trait]
impl ErrorReporter for TracingReporter {
    async fn report(&self, report: &ErrorReport) -> Result<(), ReportError> {
        tracing::error!(
            code = %report.code,
            severity = %report.severity,
            path = report.path.as_deref(),
            correlation_id = report.correlation_id.as_deref(),
            detail = %report.detail,
            "Crash report: {}",
            report.message,
        );
        Ok(())
    }
}

/// Send `report` in the background. Failures are logged.
pub fn spawn_report(
    reporter: Arc<dyn ErrorReporter>,
    report: ErrorReport,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = reporter.report(&report).await {
            tracing::warn!(
                error = %e,
                code = %report.code,
                correlation_id = report.correlation_id.as_deref(),
                "Failed to deliver crash report"
            );
        }
    })
}
