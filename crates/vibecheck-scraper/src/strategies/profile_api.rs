//! Structured profile-info endpoint strategy.
//!
//! Calls the source's `web_profile_info` JSON endpoint with spoofed
//! app/browser identification headers and parses the well-known nested
//! `data.user` shape: counts, bio, privacy flag and the edge list of recent
//! post nodes.

use serde::Deserialize;

use super::StrategyContext;
use crate::error::ScraperError;
use crate::html_extract::polite_delay;
use crate::identity::{self, API_IDENTITIES};
use crate::types::{FailureTag, Profile};

#[derive(Debug, Deserialize)]
struct WebProfileEnvelope {
    #[serde(default)]
    data: Option<EnvelopeData>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeData {
    #[serde(default)]
    user: Option<ApiUser>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ApiUser {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    biography: Option<String>,
    #[serde(default)]
    profile_pic_url: Option<String>,
    #[serde(default)]
    profile_pic_url_hd: Option<String>,
    #[serde(default)]
    is_private: bool,
    #[serde(default)]
    edge_followed_by: Option<EdgeCount>,
    #[serde(default)]
    edge_follow: Option<EdgeCount>,
    #[serde(default)]
    edge_owner_to_timeline_media: Option<MediaEdges>,
}

#[derive(Debug, Deserialize)]
struct EdgeCount {
    #[serde(default)]
    count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct MediaEdges {
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    edges: Vec<MediaEdge>,
}

#[derive(Debug, Deserialize)]
struct MediaEdge {
    node: PostNode,
}

#[derive(Debug, Deserialize)]
struct PostNode {
    #[serde(default)]
    display_url: Option<String>,
    #[serde(default)]
    edge_media_to_caption: Option<CaptionEdges>,
    #[serde(default)]
    edge_liked_by: Option<EdgeCount>,
    #[serde(default)]
    edge_media_preview_like: Option<EdgeCount>,
    #[serde(default)]
    edge_media_to_comment: Option<EdgeCount>,
}

#[derive(Debug, Deserialize)]
struct CaptionEdges {
    #[serde(default)]
    edges: Vec<CaptionEdge>,
}

#[derive(Debug, Deserialize)]
struct CaptionEdge {
    node: CaptionNode,
}

#[derive(Debug, Deserialize)]
struct CaptionNode {
    #[serde(default)]
    text: Option<String>,
}

impl PostNode {
    fn caption(&self) -> Option<String> {
        self.edge_media_to_caption
            .as_ref()?
            .edges
            .first()?
            .node
            .text
            .clone()
    }

    fn like_count(&self) -> Option<u64> {
        self.edge_liked_by
            .as_ref()
            .and_then(|e| e.count)
            .or_else(|| self.edge_media_preview_like.as_ref().and_then(|e| e.count))
    }

    fn comment_count(&self) -> Option<u64> {
        self.edge_media_to_comment.as_ref().and_then(|e| e.count)
    }
}

pub(super) async fn run(
    ctx: &StrategyContext<'_>,
    handle: &str,
) -> Result<Profile, ScraperError> {
    let identity = identity::pick(API_IDENTITIES);
    let url = format!(
        "{}/api/v1/users/web_profile_info/?username={handle}",
        ctx.base_url
    );

    let mut request = ctx
        .http
        .get(&url)
        .header(reqwest::header::USER_AGENT, identity.user_agent)
        .header(reqwest::header::ACCEPT, "*/*")
        .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .header("X-Requested-With", "XMLHttpRequest")
        .header(reqwest::header::REFERER, format!("{}/{handle}/", ctx.base_url));
    if let Some(app_id) = identity.app_id {
        request = request.header("X-IG-App-ID", app_id);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ScraperError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        });
    }

    let body = response.text().await?;
    let envelope: WebProfileEnvelope =
        serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("web_profile_info for @{handle}"),
            source: e,
        })?;

    let Some(user) = envelope.data.and_then(|d| d.user) else {
        return Ok(Profile::failed(handle, FailureTag::UserNotFound));
    };

    profile_from_user(ctx, handle, &user).await
}

/// Build a [`Profile`] from a parsed user node, downloading its images.
///
/// Shared with the embedded-page JSON strategy, which surfaces the same
/// nested shape inside the rendered page.
pub(super) async fn profile_from_user(
    ctx: &StrategyContext<'_>,
    handle: &str,
    user: &ApiUser,
) -> Result<Profile, ScraperError> {
    let identity = identity::pick(API_IDENTITIES);
    let profile_pic_url = user
        .profile_pic_url_hd
        .clone()
        .or_else(|| user.profile_pic_url.clone());

    let mut profile_pic = None;
    if let Some(pic_url) = &profile_pic_url {
        profile_pic = ctx.fetcher.fetch(pic_url, identity.user_agent).await;
    }

    let mut post_images = Vec::new();
    let mut captions = Vec::new();
    let mut like_counts = Vec::new();
    let mut comment_counts = Vec::new();

    if !user.is_private {
        let edges = user
            .edge_owner_to_timeline_media
            .as_ref()
            .map(|m| m.edges.as_slice())
            .unwrap_or_default();

        for edge in edges.iter().take(ctx.image_budget) {
            let Some(img_url) = &edge.node.display_url else {
                continue;
            };
            if ctx.deep && !post_images.is_empty() {
                polite_delay(ctx.delay_ms).await;
            }
            let Some(bytes) = ctx.fetcher.fetch(img_url, identity.user_agent).await else {
                continue;
            };
            post_images.push(bytes);
            if ctx.deep {
                captions.push(edge.node.caption());
                like_counts.push(edge.node.like_count());
                comment_counts.push(edge.node.comment_count());
            }
        }
    }

    if profile_pic.is_none() && post_images.is_empty() {
        return Ok(Profile::failed(handle, FailureTag::NoImagesFound));
    }

    Ok(Profile {
        username: handle.to_string(),
        full_name: user.full_name.clone(),
        bio: user.biography.clone(),
        profile_pic_url,
        profile_pic,
        post_images,
        captions,
        like_counts,
        comment_counts,
        follower_count: user.edge_followed_by.as_ref().and_then(|e| e.count),
        following_count: user.edge_follow.as_ref().and_then(|e| e.count),
        post_count: user
            .edge_owner_to_timeline_media
            .as_ref()
            .and_then(|m| m.count),
        is_private: user.is_private,
        failure: None,
    })
}
