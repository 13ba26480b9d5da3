use thiserror::Error;

/// Top-level error type for the `meshscout-api` crate.
///
/// Absence of a resource is NOT an error: the client maps 404 responses
/// to `Ok(None)` before any of these variants can surface. Rate limiting
/// and connection failures are retried internally and only appear here
/// once the retry budget is exhausted.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Still rate limited after the whole retry budget.
    #[error("Rate limited by the analyzer API after {attempts} attempts")]
    RateLimited { attempts: u32 },

    // ── API ─────────────────────────────────────────────────────────
    /// Non-success status from the analyzer (other than 404 and 429).
    #[error("Analyzer API error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying later.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::RateLimited { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
