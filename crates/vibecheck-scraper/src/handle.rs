//! Handle extraction from free-form user input.

use std::sync::LazyLock;

use regex::Regex;

static PROFILE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"instagram\.com/([A-Za-z0-9_.]+)").expect("valid regex"));
static BARE_HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.]+$").expect("valid regex"));

/// Path segments directly under the source domain that are never handles.
const RESERVED_SEGMENTS: &[&str] = &[
    "p", "post", "reel", "reels", "stories", "explore", "accounts", "direct",
];

/// Extract a canonical handle from a profile URL or a bare username.
///
/// Trims whitespace, a leading `@` and a trailing `/`. For source-domain
/// URLs the first path segment is taken unless it is a reserved word
/// (post-detail pages, reels and the like are not profiles). Bare input
/// matching `^[A-Za-z0-9_.]+$` passes through unchanged, case preserved.
/// Anything else yields `None`.
#[must_use]
pub fn extract_handle(input: &str) -> Option<String> {
    let text = input
        .trim()
        .trim_start_matches('@')
        .trim_end_matches('/');

    if let Some(caps) = PROFILE_URL_RE.captures(text) {
        let segment = caps.get(1)?.as_str();
        if !RESERVED_SEGMENTS.contains(&segment.to_lowercase().as_str()) {
            return Some(segment.to_string());
        }
        return None;
    }

    if BARE_HANDLE_RE.is_match(text) {
        return Some(text.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_handle_is_identity() {
        assert_eq!(extract_handle("some_user.99").as_deref(), Some("some_user.99"));
    }

    #[test]
    fn bare_handle_preserves_case() {
        assert_eq!(extract_handle("SomeUser").as_deref(), Some("SomeUser"));
    }

    #[test]
    fn leading_at_and_trailing_slash_are_trimmed() {
        assert_eq!(extract_handle(" @some_user/ ").as_deref(), Some("some_user"));
    }

    #[test]
    fn profile_url_yields_first_segment() {
        assert_eq!(
            extract_handle("https://www.instagram.com/some_user/").as_deref(),
            Some("some_user")
        );
        assert_eq!(
            extract_handle("instagram.com/some_user").as_deref(),
            Some("some_user")
        );
    }

    #[test]
    fn reserved_segments_are_not_handles() {
        for segment in ["p", "reel", "reels", "stories", "explore", "accounts", "direct"] {
            let url = format!("https://www.instagram.com/{segment}/abc123");
            assert_eq!(extract_handle(&url), None, "segment {segment} must be rejected");
        }
    }

    #[test]
    fn reserved_segment_check_is_case_insensitive() {
        assert_eq!(extract_handle("https://www.instagram.com/Reels/xyz"), None);
    }

    #[test]
    fn post_detail_url_on_foreign_domain_is_rejected() {
        assert_eq!(extract_handle("https://example.com/p/abc123"), None);
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(extract_handle("not a handle"), None);
        assert_eq!(extract_handle("https://example.com/whatever"), None);
        assert_eq!(extract_handle(""), None);
    }
}
