//! Shared HTML extraction routine used by the page-rendering strategies.
//!
//! Scans raw HTML with an ordered list of regex patterns per field. Two
//! early-exit conditions are classified before any field extraction: a
//! login-wall marker and a not-found marker. Post-image URLs are collected
//! from several CDN patterns, de-duplicated, and thumbnail variants are
//! discarded before downloading.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::ScraperError;
use crate::fetch::ImageFetcher;
use crate::types::{FailureTag, Profile};

/// Profile picture patterns, most specific first; first match wins.
static PROFILE_PIC_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"<meta property="og:image" content="([^"]+)""#,
        r#""profile_pic_url_hd":"([^"]+)""#,
        r#""profile_pic_url":"([^"]+)""#,
        r#"profilePicUrl["']?\s*[:=]\s*["']([^"']+)["']"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// CDN patterns that surface post-image URLs.
static POST_IMAGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#""display_url":"([^"]+)""#,
        r#""src":"(https://[^"]*cdninstagram[^"]*\.jpg[^"]*)""#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static OG_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta property="og:title" content="([^"]+)""#).expect("valid regex")
});
static OG_DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta property="og:description" content="([^"]+)""#).expect("valid regex")
});
static TITLE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(?\s*[•|@].*$").expect("valid regex"));

pub(crate) struct HtmlExtractOptions {
    pub image_budget: usize,
    /// Inter-download delay range in milliseconds; `(0, 0)` disables delays.
    pub delay_ms: (u64, u64),
    pub user_agent: &'static str,
}

/// Undo the JSON escaping the source applies to embedded URLs.
pub(crate) fn unescape_url(raw: &str) -> String {
    raw.replace("\\u0026", "&").replace("\\/", "/")
}

pub(crate) fn is_login_walled(html: &str) -> bool {
    html.to_lowercase().contains("loginform") || html.contains("\"require_login\":true")
}

pub(crate) fn is_not_found(html: &str) -> bool {
    html.contains("Sorry, this page") || html.contains("Page Not Found")
}

pub(crate) fn is_private(html: &str) -> bool {
    html.contains("This account is private") || html.contains("\"is_private\":true")
}

/// First profile-picture URL matched by the pattern ladder.
pub(crate) fn find_profile_pic_url(html: &str) -> Option<String> {
    PROFILE_PIC_PATTERNS
        .iter()
        .find_map(|re| re.captures(html))
        .and_then(|caps| caps.get(1))
        .map(|m| unescape_url(m.as_str()))
}

/// Collect up to `budget` candidate post-image URLs, de-duplicated, with
/// known thumbnail-sized variants discarded.
pub(crate) fn collect_post_image_urls(html: &str, budget: usize) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for re in POST_IMAGE_PATTERNS.iter() {
        for caps in re.captures_iter(html) {
            let Some(m) = caps.get(1) else { continue };
            let url = unescape_url(m.as_str());
            if url.contains("150x150") || url.contains("s150x150") {
                continue;
            }
            if !urls.contains(&url) {
                urls.push(url);
            }
            if urls.len() >= budget {
                return urls;
            }
        }
    }
    urls
}

/// Sleep for a random duration inside `delay_ms` to throttle bulk fetches.
///
/// Rate-limiting discipline on outbound traffic only; `(0, 0)` is a no-op.
pub(crate) async fn polite_delay(delay_ms: (u64, u64)) {
    let (min, max) = delay_ms;
    if max == 0 {
        return;
    }
    let ms = if min == max {
        min
    } else {
        rand::random_range(min..=max)
    };
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

/// Extract a profile from raw page HTML, downloading images as it goes.
///
/// Login-wall and not-found markers short-circuit to a tagged profile before
/// any field extraction. A page without any profile-picture URL yields
/// `no_profile_pic`; a picture URL whose download fails yields
/// `download_failed`.
///
/// # Errors
///
/// This routine itself never errors; the `Result` mirrors the strategy
/// signature so callers can use it as a tail expression.
pub(crate) async fn extract_profile(
    fetcher: &ImageFetcher,
    handle: &str,
    html: &str,
    opts: &HtmlExtractOptions,
) -> Result<Profile, ScraperError> {
    if is_login_walled(html) {
        return Ok(Profile::failed(handle, FailureTag::LoginRequired));
    }
    if is_not_found(html) {
        return Ok(Profile::failed(handle, FailureTag::UserNotFound));
    }

    let private = is_private(html);

    let Some(profile_pic_url) = find_profile_pic_url(html) else {
        return Ok(Profile::failed(handle, FailureTag::NoProfilePic));
    };

    let Some(profile_pic) = fetcher.fetch(&profile_pic_url, opts.user_agent).await else {
        return Ok(Profile::failed(handle, FailureTag::DownloadFailed));
    };

    let mut post_images = Vec::new();
    if !private {
        let candidates = collect_post_image_urls(html, opts.image_budget);
        for (i, url) in candidates.iter().enumerate() {
            if i > 0 {
                polite_delay(opts.delay_ms).await;
            }
            if let Some(bytes) = fetcher.fetch(url, opts.user_agent).await {
                post_images.push(bytes);
            }
            if post_images.len() >= opts.image_budget {
                break;
            }
        }
    }

    let full_name = OG_TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| TITLE_SUFFIX_RE.replace(m.as_str(), "").trim().to_string())
        .filter(|s| !s.is_empty());

    let bio = OG_DESCRIPTION_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    Ok(Profile {
        username: handle.to_string(),
        full_name,
        bio,
        profile_pic_url: Some(profile_pic_url),
        profile_pic: Some(profile_pic),
        post_images,
        is_private: private,
        ..Profile::default()
    })
}
