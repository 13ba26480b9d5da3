// Transport configuration for building the reqwest::Client behind
// AnalyzerClient: timeout plus the retry budget the client consumes
// when the analyzer rate-limits or the connection drops.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Total attempts per logical fetch (first try included).
    pub retries: u32,
    /// Base delay between attempts. Doubled per attempt when rate limited,
    /// used as-is for connection-level failures.
    pub retry_delay: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("meshscout/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(client)
    }
}
