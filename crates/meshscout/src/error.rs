//! CLI error types with miette diagnostics.
//!
//! Maps `meshscout_api::Error` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

/// Exit codes per the CLI spec.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
    pub const RATE_LIMITED: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the analyzer API at {url}")]
    #[diagnostic(
        code(meshscout::connection_failed),
        help(
            "Check your network connection and the base URL.\n\
             URL: {url}\n\
             Override with --base-url or MESHSCOUT_BASE_URL."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Analyzer kept rate-limiting after {attempts} attempts")]
    #[diagnostic(
        code(meshscout::rate_limited),
        help("The analyzer is under load. Wait a minute and retry, or narrow the region.")
    )]
    RateLimited { attempts: u32 },

    #[error("Analyzer returned an error ({status}): {message}")]
    #[diagnostic(code(meshscout::api_error))]
    ApiError { status: u16, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(meshscout::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(meshscout::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(meshscout::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::RateLimited { .. } => exit_code::RATE_LIMITED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── meshscout_api::Error → CliError mapping ──────────────────────────

/// Translate an API error, attaching the base URL for connection diagnostics.
pub fn from_api(err: meshscout_api::Error, base_url: &str) -> CliError {
    match err {
        meshscout_api::Error::Transport(source) => CliError::ConnectionFailed {
            url: base_url.to_string(),
            source: Box::new(source),
        },
        meshscout_api::Error::InvalidUrl(source) => CliError::Validation {
            field: "base-url".into(),
            reason: source.to_string(),
        },
        meshscout_api::Error::RateLimited { attempts } => CliError::RateLimited { attempts },
        meshscout_api::Error::Status { status, message } => {
            CliError::ApiError { status, message }
        }
        meshscout_api::Error::Deserialization { message, .. } => CliError::ApiError {
            status: 200,
            message: format!("unexpected response shape: {message}"),
        },
    }
}
