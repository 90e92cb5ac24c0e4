//! Filesystem-mediated asynchronous analysis backend.
//!
//! Models an external, out-of-band worker without a push channel: each call
//! writes an image, a rendered prompt and request metadata into a uniquely
//! named request slot, then polls for a correspondingly named response file.
//! Concurrent requests use distinct generated ids and never contend for a
//! slot.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AnalysisError;
use crate::prompt;
use crate::report::Report;

#[derive(Debug, Serialize)]
struct RequestMetadata<'a> {
    request_id: &'a str,
    language: &'a str,
    roast_mode: bool,
    created_at: DateTime<Utc>,
    status: &'static str,
}

pub struct BridgeBackend {
    request_dir: PathBuf,
    response_dir: PathBuf,
    timeout: Duration,
    poll_interval: Duration,
}

impl BridgeBackend {
    #[must_use]
    pub fn new(
        request_dir: PathBuf,
        response_dir: PathBuf,
        timeout_secs: u64,
        poll_interval_secs: u64,
    ) -> Self {
        Self {
            request_dir,
            response_dir,
            timeout: Duration::from_secs(timeout_secs),
            poll_interval: Duration::from_secs(poll_interval_secs.max(1)),
        }
    }

    /// Write the request slot and wait for the worker's response file.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Io`] if the request slot cannot be written.
    /// - [`AnalysisError::Timeout`] if no parseable response appears within
    ///   the wall-clock budget.
    pub async fn analyze(
        &self,
        image: &[u8],
        language: &str,
        roast: bool,
    ) -> Result<Report, AnalysisError> {
        let request_id = short_request_id();
        let slot = self.request_dir.join(&request_id);
        let response_path = self.response_dir.join(format!("{request_id}.json"));

        tokio::fs::create_dir_all(&slot).await?;
        tokio::fs::create_dir_all(&self.response_dir).await?;

        tokio::fs::write(slot.join("image.jpg"), image).await?;
        tokio::fs::write(slot.join("prompt.txt"), prompt::shallow_prompt(language, roast)).await?;

        let metadata = RequestMetadata {
            request_id: &request_id,
            language,
            roast_mode: roast,
            created_at: Utc::now(),
            status: "pending",
        };
        tokio::fs::write(
            slot.join("metadata.json"),
            serde_json::to_vec_pretty(&metadata)?,
        )
        .await?;

        tracing::info!(
            request_id = %request_id,
            slot = %slot.display(),
            "analysis request written; waiting for bridge worker"
        );

        let deadline = Instant::now() + self.timeout;
        loop {
            match tokio::fs::read(&response_path).await {
                Ok(bytes) => match serde_json::from_slice::<Report>(&bytes) {
                    Ok(report) => return Ok(report),
                    // A worker may still be mid-write; keep polling rather
                    // than consuming a partial response.
                    Err(e) => {
                        tracing::debug!(
                            request_id = %request_id,
                            error = %e,
                            "response file not yet parseable"
                        );
                    }
                },
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(AnalysisError::Io(e)),
            }

            if Instant::now() >= deadline {
                return Err(AnalysisError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// The mailbox contract carries a single image file; multi-image
    /// analysis is a capability this backend does not have.
    ///
    /// # Errors
    ///
    /// Always returns [`AnalysisError::Unsupported`].
    pub fn analyze_deep_unsupported(&self) -> AnalysisError {
        AnalysisError::Unsupported {
            backend: "bridge",
            operation: "deep analysis",
        }
    }
}

/// Short, filesystem-friendly request id.
fn short_request_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}
