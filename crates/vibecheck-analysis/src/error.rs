use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("could not parse provider reply as JSON: {reason}")]
    Malformed { reason: String },

    #[error("analysis timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("{backend} backend does not support {operation}")]
    Unsupported {
        backend: &'static str,
        operation: &'static str,
    },

    #[error("bridge I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ANTHROPIC_API_KEY is required when the bridge is disabled")]
    MissingCredential,
}
