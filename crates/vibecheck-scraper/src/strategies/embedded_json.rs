//! Rendered-page JSON strategy.
//!
//! Fetches the HTML profile page and looks for embedded JSON in several
//! known shapes: the inline shared-data script, an ld+json block, and
//! finally bare per-field regexes. Later shapes are less complete; the
//! per-field fallback may yield only a picture URL.

use std::sync::LazyLock;

use regex::Regex;

use super::profile_api::{profile_from_user, ApiUser};
use super::StrategyContext;
use crate::error::ScraperError;
use crate::fetch::fetch_html;
use crate::html_extract::{find_profile_pic_url, is_private, unescape_url};
use crate::identity::{self, DESKTOP_IDENTITIES};
use crate::types::Profile;

static SHARED_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)window\._sharedData\s*=\s*(\{.+?\});</script>").expect("valid regex")
});
static LD_JSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script type="application/ld\+json"[^>]*>(.*?)</script>"#)
        .expect("valid regex")
});

pub(super) async fn run(
    ctx: &StrategyContext<'_>,
    handle: &str,
) -> Result<Profile, ScraperError> {
    let identity = identity::pick(DESKTOP_IDENTITIES);
    let url = format!("{}/{handle}/", ctx.base_url);
    let html = fetch_html(ctx.http, &url, identity).await?;

    // Shape 1: the inline shared-data blob carries the full user node.
    if let Some(user) = shared_data_user(&html, handle) {
        tracing::debug!(handle, "embedded shared-data blob found");
        return profile_from_user(ctx, handle, &user).await;
    }

    // Shape 2: an ld+json block names the profile and its picture.
    if let Some((name, image_url)) = ld_json_profile(&html) {
        tracing::debug!(handle, "ld+json profile block found");
        if let Some(bytes) = ctx.fetcher.fetch(&image_url, identity.user_agent).await {
            return Ok(Profile {
                username: handle.to_string(),
                full_name: name,
                profile_pic_url: Some(image_url),
                profile_pic: Some(bytes),
                is_private: is_private(&html),
                ..Profile::default()
            });
        }
    }

    // Shape 3: loose per-field regexes; a picture URL alone is acceptable.
    if let Some(pic_url) = find_profile_pic_url(&html) {
        tracing::debug!(handle, "per-field picture URL found");
        if let Some(bytes) = ctx.fetcher.fetch(&pic_url, identity.user_agent).await {
            return Ok(Profile {
                username: handle.to_string(),
                profile_pic_url: Some(pic_url),
                profile_pic: Some(bytes),
                is_private: is_private(&html),
                ..Profile::default()
            });
        }
    }

    Err(ScraperError::Extraction {
        strategy: "embedded_json",
        handle: handle.to_string(),
    })
}

/// Locate the user node inside the shared-data blob, if present.
fn shared_data_user(html: &str, handle: &str) -> Option<ApiUser> {
    let raw = SHARED_DATA_RE.captures(html)?.get(1)?.as_str();
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let user = value.pointer("/entry_data/ProfilePage/0/graphql/user")?;
    // Sanity-check the node belongs to the requested profile when it says so.
    if let Some(username) = user.get("username").and_then(serde_json::Value::as_str) {
        if !username.eq_ignore_ascii_case(handle) {
            return None;
        }
    }
    serde_json::from_value(user.clone()).ok()
}

/// Extract (name, image URL) from an ld+json person/profile block.
fn ld_json_profile(html: &str) -> Option<(Option<String>, String)> {
    for caps in LD_JSON_RE.captures_iter(html) {
        let raw = caps.get(1)?.as_str().trim();
        let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
            continue;
        };
        let name = value
            .get("name")
            .and_then(serde_json::Value::as_str)
            .map(ToOwned::to_owned);
        let image = value.get("image").and_then(|img| match img {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(o) => o
                .get("url")
                .and_then(serde_json::Value::as_str)
                .map(ToOwned::to_owned),
            _ => None,
        });
        if let Some(image) = image {
            return Some((name, unescape_url(&image)));
        }
    }
    None
}
