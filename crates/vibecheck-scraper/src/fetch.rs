//! Low-level HTTP helpers: image downloads and page fetches.

use std::time::Duration;

use crate::error::ScraperError;
use crate::identity::ClientIdentity;

/// Bodies smaller than this are treated as placeholder/error images.
const MIN_IMAGE_BYTES: usize = 1_000;

const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/*,*/*;q=0.8";
const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Downloads a single remote image with validation and failure tolerance.
///
/// Network failures, non-2xx statuses and implausibly small bodies all yield
/// `None`; the caller decides whether that is fatal. Retry policy lives in
/// the orchestrating strategy (move to the next candidate URL or the next
/// strategy), never here.
pub struct ImageFetcher {
    client: reqwest::Client,
    referer: String,
}

impl ImageFetcher {
    /// Creates a fetcher with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, referer: impl Into<String>) -> Result<Self, ScraperError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            referer: referer.into(),
        })
    }

    /// Fetches `url` and returns the body bytes, or `None` on any failure.
    pub async fn fetch(&self, url: &str, user_agent: &str) -> Option<Vec<u8>> {
        let response = match self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, user_agent)
            .header(reqwest::header::ACCEPT, IMAGE_ACCEPT)
            .header(reqwest::header::REFERER, &self.referer)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::debug!(url, error = %e, "image fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(url, status = %response.status(), "image fetch non-success");
            return None;
        }

        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!(url, error = %e, "image body read failed");
                return None;
            }
        };

        if bytes.len() < MIN_IMAGE_BYTES {
            tracing::debug!(url, len = bytes.len(), "image body too small; likely a placeholder");
            return None;
        }

        Some(bytes.to_vec())
    }
}

/// Fetch the HTML body of a URL under the given client identity.
///
/// # Errors
///
/// - [`ScraperError::Http`] on network failure or timeout.
/// - [`ScraperError::UnexpectedStatus`] on any non-2xx status.
pub(crate) async fn fetch_html(
    client: &reqwest::Client,
    url: &str,
    identity: ClientIdentity,
) -> Result<String, ScraperError> {
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, identity.user_agent)
        .header(reqwest::header::ACCEPT, HTML_ACCEPT)
        .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .header(reqwest::header::CACHE_CONTROL, "no-cache")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScraperError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_owned(),
        });
    }

    Ok(response.text().await?)
}
