// Hand-crafted async HTTP client for the letsmesh.net analyzer API.
//
// Base path: https://api.letsmesh.net/api/
// No authentication; the analyzer is a public read-only service.
//
// Every fetch goes through `get`, which owns the retry policy:
//   404             -> Ok(None)  (absence is an expected outcome)
//   429             -> sleep delay * 2^attempt, retry (consumes an attempt)
//   connection-level -> sleep fixed delay, retry
// Exhausting the budget propagates the final failure to the caller.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::Error;
use crate::models::{NodesResponse, RawAdvert};
use crate::transport::TransportConfig;

/// Production base URL of the analyzer API.
pub const DEFAULT_BASE_URL: &str = "https://api.letsmesh.net/api";

/// Async client for the analyzer API.
pub struct AnalyzerClient {
    http: reqwest::Client,
    base_url: Url,
    retries: u32,
    retry_delay: Duration,
}

impl AnalyzerClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client against `base_url` with the given transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, transport)
    }

    /// Wrap an existing `reqwest::Client` (used by tests against a mock server).
    pub fn with_client(
        http: reqwest::Client,
        base_url: &str,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            retries: transport.retries.max(1),
            retry_delay: transport.retry_delay,
        })
    }

    /// Ensure the base path ends with `/` so relative joins append
    /// instead of replacing the last segment.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// Join a relative path (e.g. `"nodes"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Fetch primitive ──────────────────────────────────────────────

    /// GET `path` with `query`, retrying per the transport budget.
    ///
    /// `Ok(None)` means the resource does not exist (404) -- callers must
    /// branch on this explicitly rather than treating it as a failure.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, Error> {
        let url = self.url(path)?;

        for attempt in 0..self.retries {
            debug!("GET {url} params={query:?} (attempt {})", attempt + 1);

            match self.http.get(url.clone()).query(query).send().await {
                Ok(resp) => {
                    let status = resp.status();

                    if status == StatusCode::NOT_FOUND {
                        return Ok(None);
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let wait = self.retry_delay * 2_u32.saturating_pow(attempt);
                        warn!("rate limited by {url}, waiting {}ms", wait.as_millis());
                        tokio::time::sleep(wait).await;
                        continue;
                    }

                    if !status.is_success() {
                        let message = resp.text().await.unwrap_or_default();
                        return Err(Error::Status {
                            status: status.as_u16(),
                            message: if message.is_empty() {
                                status.to_string()
                            } else {
                                message
                            },
                        });
                    }

                    let body = resp.text().await?;
                    return serde_json::from_str(&body).map(Some).map_err(|e| {
                        // Back off to a char boundary so multibyte bodies
                        // never panic the preview slice.
                        let mut cut = body.len().min(200);
                        while !body.is_char_boundary(cut) {
                            cut -= 1;
                        }
                        let preview = &body[..cut];
                        Error::Deserialization {
                            message: format!("{e} (body preview: {preview:?})"),
                            body,
                        }
                    });
                }
                Err(e) if attempt + 1 < self.retries => {
                    warn!(
                        "connection error, retrying in {}ms: {e}",
                        self.retry_delay.as_millis()
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(Error::Transport(e)),
            }
        }

        // Only reachable when every attempt ended in a 429.
        Err(Error::RateLimited {
            attempts: self.retries,
        })
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Fetch the bulk nodes index, bounded at `limit` entries.
    ///
    /// The analyzer has no server-side region or recency filter for this
    /// endpoint; callers fetch the whole index and filter locally.
    pub async fn list_nodes(&self, limit: u32) -> Result<Option<NodesResponse>, Error> {
        self.get("nodes", &[("limit", limit.to_string())]).await
    }

    /// Fetch recent adverts for one node, newest first.
    ///
    /// `Ok(None)` means the analyzer knows no adverts for this key.
    pub async fn node_adverts(
        &self,
        public_key: &str,
        limit: u32,
    ) -> Result<Option<Vec<RawAdvert>>, Error> {
        self.get(
            &format!("nodes/{public_key}/adverts"),
            &[("limit", limit.to_string())],
        )
        .await
    }

    /// Fetch a window of recent advert-type packets.
    ///
    /// The analyzer's own `region` parameter exists but is unreliable for
    /// this endpoint; discovery passes `None` and re-filters locally.
    pub async fn advert_packets(
        &self,
        limit: u32,
        region: Option<&str>,
    ) -> Result<Option<Vec<RawAdvert>>, Error> {
        let mut query = vec![
            ("payload_type", "Advert".to_owned()),
            ("limit", limit.to_string()),
        ];
        if let Some(region) = region {
            query.push(("region", region.to_owned()));
        }
        self.get("packets", &query).await
    }
}
