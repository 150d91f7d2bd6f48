//! HTTP retrieval of listing and article pages.
//!
//! The harvester never retries: a failed request is reported once as a
//! [`FetchError`] and the caller decides whether that ends the run (listing
//! page) or degrades to a placeholder (article page).

use crate::cli::SiteConfig;
use crate::error::FetchError;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Anything that can turn a URL into page HTML.
///
/// [`HttpFetcher`] is the real implementation; tests plug in canned pages.
pub trait PageFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
}

/// [`PageFetcher`] backed by a `reqwest` client carrying the site's
/// User-Agent header and request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build the client from `config`.
    ///
    /// # Errors
    ///
    /// [`FetchError::UserAgent`] if the User-Agent is not a valid header
    /// value, [`FetchError::Client`] if the TLS backend cannot be initialised.
    pub fn new(config: &SiteConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(FetchError::UserAgent)?;
        headers.insert(USER_AGENT, agent);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
