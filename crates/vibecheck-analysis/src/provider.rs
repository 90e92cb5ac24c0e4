//! Direct synchronous client for the external multimodal provider.
//!
//! Wraps `reqwest` with provider-specific error handling and typed wire
//! shapes for the messages API. One POST per analysis call carries a system
//! prompt, a mode/tone-specific user prompt and base64-encoded image
//! content; the textual reply must itself contain an embedded JSON object.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::json_repair::parse_report_text;
use crate::prompt;
use crate::report::{engagement_rate, DeepInput, Report};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock {
    Image { source: ImageSource },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'static str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

impl MessagesResponse {
    fn first_text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.kind == "text")
            .map(|b| b.text.as_str())
    }
}

fn image_block(image: &[u8]) -> ContentBlock {
    ContentBlock::Image {
        source: ImageSource {
            kind: "base64",
            media_type: "image/jpeg",
            data: BASE64.encode(image),
        },
    }
}

pub struct ProviderBackend {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ProviderBackend {
    /// Creates a client pointed at the production provider API.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str) -> Result<Self, AnalysisError> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        base_url: &str,
    ) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            model: model.to_owned(),
        })
    }

    /// Single-image analysis.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Api`] on a non-2xx provider status.
    /// - [`AnalysisError::Malformed`] if the reply carries no parseable JSON
    ///   object even after the repair pass.
    /// - [`AnalysisError::Http`] on network failure or timeout.
    pub async fn analyze(
        &self,
        image: &[u8],
        language: &str,
        roast: bool,
    ) -> Result<Report, AnalysisError> {
        let blocks = vec![
            image_block(image),
            ContentBlock::Text {
                text: prompt::shallow_prompt(language, roast).to_string(),
            },
        ];
        let text = self.send(blocks, 1024).await?;
        let value = parse_report_text(&text)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Multi-image analysis with engagement metadata.
    ///
    /// The engagement rate is computed locally and injected only when the
    /// provider's reply omitted or zeroed the field.
    ///
    /// # Errors
    ///
    /// Same as [`ProviderBackend::analyze`].
    pub async fn analyze_deep(
        &self,
        input: &DeepInput<'_>,
        language: &str,
        roast: bool,
    ) -> Result<Report, AnalysisError> {
        let mut blocks: Vec<ContentBlock> = input.images.iter().map(|i| image_block(i)).collect();
        blocks.push(ContentBlock::Text {
            text: prompt::deep_prompt(language, roast, input),
        });

        let text = self.send(blocks, 2048).await?;
        let value = parse_report_text(&text)?;
        let mut report: Report = serde_json::from_value(value)?;

        if report.engagement_rate.is_none() || report.engagement_rate == Some(0.0) {
            report.engagement_rate = Some(engagement_rate(
                input.like_counts,
                input.comment_counts,
                input.images.len(),
                input.follower_count,
            ));
        }

        Ok(report)
    }

    async fn send(
        &self,
        content: Vec<ContentBlock>,
        max_tokens: u32,
    ) -> Result<String, AnalysisError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            system: prompt::SYSTEM_PROMPT,
            messages: vec![WireMessage {
                role: "user",
                content,
            }],
        };

        tracing::debug!(model = %self.model, max_tokens, "provider analysis request");

        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: MessagesResponse = response.json().await?;
        envelope
            .first_text()
            .map(ToOwned::to_owned)
            .ok_or_else(|| AnalysisError::Malformed {
                reason: "provider reply contains no text block".to_string(),
            })
    }
}
