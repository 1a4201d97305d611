use std::str::FromStr;

use praxis_core::error::Severity;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the JWT
/// secret and database URL, which must be provided.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long background tasks get to drain after the listener stops.
    pub shutdown_timeout_secs: u64,
    pub database_url: String,
    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,
    pub jwt: JwtConfig,
    pub errors: ErrorHandlingConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `DATABASE_URL`          | **required**               |
    /// | `LOG_FORMAT`            | `text` (`json` to switch)  |
    ///
    /// See [`JwtConfig::from_env`] and [`ErrorHandlingConfig::from_env`] for
    /// the remaining variables.
    ///
    /// # Panics
    ///
    /// Panics on a missing `DATABASE_URL` or an unparseable value.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = env_parse("PORT", 3000);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_parse("REQUEST_TIMEOUT_SECS", 30);
        let shutdown_timeout_secs: u64 = env_parse("SHUTDOWN_TIMEOUT_SECS", 30);

        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let log_json = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            database_url,
            log_json,
            jwt: JwtConfig::from_env(),
            errors: ErrorHandlingConfig::from_env(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Which errors are pushed to the caller as in-app notifications.
///
/// Only operational errors are ever pushed; the policy narrows that further
/// by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyPolicy {
    /// Every operational error.
    All,
    /// Operational errors below CRITICAL.
    #[default]
    Operational,
    /// Only CRITICAL operational errors.
    Critical,
    None,
}

impl NotifyPolicy {
    /// Whether an error with this severity and operational flag is pushed.
    pub fn should_notify(self, severity: Severity, operational: bool) -> bool {
        if !operational {
            return false;
        }
        match self {
            NotifyPolicy::All => true,
            NotifyPolicy::Operational => severity < Severity::Critical,
            NotifyPolicy::Critical => severity == Severity::Critical,
            NotifyPolicy::None => false,
        }
    }
}

impl FromStr for NotifyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALL" => Ok(NotifyPolicy::All),
            "OPERATIONAL" => Ok(NotifyPolicy::Operational),
            "CRITICAL" => Ok(NotifyPolicy::Critical),
            "NONE" => Ok(NotifyPolicy::None),
            other => Err(format!(
                "unknown notify policy '{other}', expected ALL, OPERATIONAL, CRITICAL or NONE"
            )),
        }
    }
}

/// Behaviour switches for the error filter.
#[derive(Debug, Clone)]
pub struct ErrorHandlingConfig {
    /// Add a `stack` detail to error responses.
    pub include_stack_trace: bool,
    pub notify_frontend: NotifyPolicy,
    pub enable_logging: bool,
    /// Keep the `context` object in error responses.
    pub capture_context: bool,
    pub crash_reporting: bool,
    /// Webhook that receives crash reports. Without one, reports are logged.
    pub crash_report_url: Option<String>,
}

impl Default for ErrorHandlingConfig {
    fn default() -> Self {
        Self {
            include_stack_trace: false,
            notify_frontend: NotifyPolicy::default(),
            enable_logging: true,
            capture_context: true,
            crash_reporting: false,
            crash_report_url: None,
        }
    }
}

impl ErrorHandlingConfig {
    /// | Env Var                      | Default       |
    /// |------------------------------|---------------|
    /// | `ERRORS_INCLUDE_STACK_TRACE` | `false`       |
    /// | `ERRORS_NOTIFY_FRONTEND`     | `OPERATIONAL` |
    /// | `ERRORS_ENABLE_LOGGING`      | `true`        |
    /// | `ERRORS_CAPTURE_CONTEXT`     | `true`        |
    /// | `ERRORS_CRASH_REPORTING`     | `false`       |
    /// | `CRASH_REPORT_URL`           | unset         |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let notify_frontend = match std::env::var("ERRORS_NOTIFY_FRONTEND") {
            Ok(raw) => raw
                .parse()
                .unwrap_or_else(|e| panic!("ERRORS_NOTIFY_FRONTEND: {e}")),
            Err(_) => defaults.notify_frontend,
        };
        Self {
            include_stack_trace: env_parse("ERRORS_INCLUDE_STACK_TRACE", defaults.include_stack_trace),
            notify_frontend,
            enable_logging: env_parse("ERRORS_ENABLE_LOGGING", defaults.enable_logging),
            capture_context: env_parse("ERRORS_CAPTURE_CONTEXT", defaults.capture_context),
            crash_reporting: env_parse("ERRORS_CRASH_REPORTING", defaults.crash_reporting),
            crash_report_url: std::env::var("CRASH_REPORT_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
        }
    }
}

/// Read and parse an env var, falling back to `default` when unset.
fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_policy_parses_case_insensitively() {
        assert_eq!("all".parse::<NotifyPolicy>().unwrap(), NotifyPolicy::All);
        assert_eq!(" Critical ".parse::<NotifyPolicy>().unwrap(), NotifyPolicy::Critical);
        assert!("sometimes".parse::<NotifyPolicy>().is_err());
    }

    #[test]
    fn non_operational_errors_are_never_pushed() {
        for policy in [NotifyPolicy::All, NotifyPolicy::Operational, NotifyPolicy::Critical] {
            assert!(!policy.should_notify(Severity::Critical, false));
            assert!(!policy.should_notify(Severity::Low, false));
        }
    }

    #[test]
    fn policy_narrows_by_severity() {
        assert!(NotifyPolicy::All.should_notify(Severity::Critical, true));
        assert!(NotifyPolicy::Operational.should_notify(Severity::High, true));
        assert!(!NotifyPolicy::Operational.should_notify(Severity::Critical, true));
        assert!(NotifyPolicy::Critical.should_notify(Severity::Critical, true));
        assert!(!NotifyPolicy::Critical.should_notify(Severity::Medium, true));
        assert!(!NotifyPolicy::None.should_notify(Severity::Medium, true));
    }

    #[test]
    fn error_handling_defaults() {
        let config = ErrorHandlingConfig::default();
        assert!(!config.include_stack_trace);
        assert_eq!(config.notify_frontend, NotifyPolicy::Operational);
        assert!(config.enable_logging);
        assert!(config.capture_context);
        assert!(!config.crash_reporting);
    }
}
