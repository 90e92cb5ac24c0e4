use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("no extractable profile data for @{handle} via {strategy}")]
    Extraction {
        strategy: &'static str,
        handle: String,
    },
}

impl ScraperError {
    /// Whether this error was caused by a request timing out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, ScraperError::Http(e) if e.is_timeout())
    }
}
