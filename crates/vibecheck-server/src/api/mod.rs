use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use vibecheck_analysis::{AnalysisBackend, AnalysisError, DeepInput, Report};
use vibecheck_scraper::{FailureTag, Profile, ProfileResolver, ResolveMode};

use crate::middleware::request_id;
use crate::quota::QuotaGate;

/// Uploaded images larger than this are rejected before analysis.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Post-image count below which a deep request is served shallow.
const DEEP_MIN_IMAGES: usize = 3;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ProfileResolver>,
    pub backend: Arc<AnalysisBackend>,
    pub quota: QuotaGate,
    pub max_posts: usize,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_roast() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeUploadRequest {
    pub image_base64: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_roast")]
    pub roast_mode: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeProfileRequest {
    pub url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_roast")]
    pub roast_mode: bool,
    #[serde(default)]
    pub deep: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    #[serde(flatten)]
    pub report: Report,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl AnalyzeResponse {
    fn ok(report: Report, username: Option<String>) -> Self {
        Self {
            success: true,
            result: Some(AnalysisResult {
                id: Uuid::new_v4(),
                report,
                created_at: Utc::now(),
            }),
            error: None,
            error_code: None,
            username,
        }
    }

    fn err(code: &str, message: &str, username: Option<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(message.to_string()),
            error_code: Some(code.to_string()),
            username,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RemainingUsesResponse {
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    backend: &'static str,
}

/// User-facing message for a resolver failure tag.
///
/// Prose lives here at the routing layer; the core only guarantees the
/// stable tag set.
fn failure_message(tag: FailureTag) -> &'static str {
    match tag {
        FailureTag::InvalidUsername => "That doesn't look like a valid username or profile link",
        FailureTag::UserNotFound => "Profile not found",
        FailureTag::LoginRequired => "The source wants a login; try uploading a screenshot",
        FailureTag::Timeout => "The source responded too slowly; try again",
        FailureTag::NoImagesFound => "No profile images found; try uploading a screenshot",
        FailureTag::NoProfilePic => {
            "Couldn't fetch the profile picture; try uploading a screenshot"
        }
        FailureTag::DownloadFailed => "Image download failed; try uploading a screenshot",
        FailureTag::AllMethodsFailed => {
            "The source is blocking automated access; try uploading a screenshot"
        }
        FailureTag::InsufficientData => "Not enough profile data to analyze",
    }
}

fn analysis_error_response(error: &AnalysisError, username: Option<String>) -> AnalyzeResponse {
    tracing::error!(error = %error, "analysis failed");
    match error {
        AnalysisError::Timeout { .. } => {
            AnalyzeResponse::err("analysis_timeout", "Analysis timed out; try again", username)
        }
        AnalysisError::Unsupported { .. } => AnalyzeResponse::err(
            "deep_unsupported",
            "Deep analysis is not available on this deployment",
            username,
        ),
        _ => AnalyzeResponse::err("ai_error", "Analysis failed; try again later", username),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/remaining-uses", get(remaining_uses))
        .route("/api/v1/analyze", post(analyze_upload))
        .route("/api/v1/analyze-profile", post(analyze_profile))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        backend: state.backend.name(),
    })
}

async fn remaining_uses(State(state): State<AppState>) -> impl IntoResponse {
    // TODO: derive the quota key from the authenticated user once auth lands.
    let client_id = "anonymous";
    Json(RemainingUsesResponse {
        remaining: state.quota.remaining(client_id).await,
        reset_at: state.quota.reset_time(),
    })
}

/// Explicit image upload: bypasses profile resolution entirely.
async fn analyze_upload(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeUploadRequest>,
) -> impl IntoResponse {
    let client_id = "anonymous";

    if !state.quota.admit(client_id).await {
        return Json(AnalyzeResponse::err(
            "rate_limit",
            "Daily limit reached; come back tomorrow",
            None,
        ));
    }

    let Ok(image) = BASE64.decode(&request.image_base64) else {
        return Json(AnalyzeResponse::err(
            "invalid_image",
            "Image payload is not valid base64",
            None,
        ));
    };
    if image.len() > MAX_UPLOAD_BYTES {
        return Json(AnalyzeResponse::err(
            "image_too_large",
            "Image too large (max 10MB)",
            None,
        ));
    }

    match state
        .backend
        .analyze(&image, &request.language, request.roast_mode)
        .await
    {
        Ok(report) => {
            state.quota.record_use(client_id).await;
            Json(AnalyzeResponse::ok(report, None))
        }
        Err(e) => Json(analysis_error_response(&e, None)),
    }
}

/// Resolve a profile identifier, then analyze its imagery.
async fn analyze_profile(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeProfileRequest>,
) -> impl IntoResponse {
    let client_id = "anonymous";

    if !state.quota.admit(client_id).await {
        return Json(AnalyzeResponse::err(
            "rate_limit",
            "Daily limit reached; come back tomorrow",
            None,
        ));
    }

    let mode = if request.deep {
        ResolveMode::Deep {
            max_posts: state.max_posts,
        }
    } else {
        ResolveMode::Shallow
    };
    let profile = state.resolver.resolve(&request.url, mode).await;
    let username = Some(profile.username.clone()).filter(|u| !u.is_empty());

    if let Some(tag) = profile.failure {
        return Json(AnalyzeResponse::err(
            tag.as_str(),
            failure_message(tag),
            username,
        ));
    }

    if profile.is_private && profile.profile_pic.is_none() {
        return Json(AnalyzeResponse::err(
            "private_account",
            "This account is private; try uploading a screenshot",
            username,
        ));
    }

    let outcome = if request.deep && profile.post_images.len() >= DEEP_MIN_IMAGES {
        analyze_deep(&state.backend, &profile, &request).await
    } else {
        match profile.primary_image() {
            Some(image) => {
                state
                    .backend
                    .analyze(image, &request.language, request.roast_mode)
                    .await
            }
            None => {
                return Json(AnalyzeResponse::err(
                    FailureTag::InsufficientData.as_str(),
                    failure_message(FailureTag::InsufficientData),
                    username,
                ));
            }
        }
    };

    match outcome {
        Ok(report) => {
            state.quota.record_use(client_id).await;
            Json(AnalyzeResponse::ok(report, username))
        }
        Err(e) => Json(analysis_error_response(&e, username)),
    }
}

async fn analyze_deep(
    backend: &AnalysisBackend,
    profile: &Profile,
    request: &AnalyzeProfileRequest,
) -> Result<Report, AnalysisError> {
    let input = DeepInput {
        images: &profile.post_images,
        captions: &profile.captions,
        like_counts: &profile.like_counts,
        comment_counts: &profile.comment_counts,
        follower_count: profile.follower_count,
        bio: profile.bio.as_deref(),
    };
    backend
        .analyze_deep(&input, &request.language, request.roast_mode)
        .await
}
