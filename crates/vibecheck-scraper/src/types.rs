use serde::{Deserialize, Serialize};

/// Stable failure tags surfaced on a [`Profile`].
///
/// The serialized snake_case strings are a contract with callers, which map
/// them to user-facing messages. The core never formats prose itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureTag {
    InvalidUsername,
    UserNotFound,
    LoginRequired,
    Timeout,
    NoImagesFound,
    NoProfilePic,
    DownloadFailed,
    AllMethodsFailed,
    InsufficientData,
}

impl FailureTag {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FailureTag::InvalidUsername => "invalid_username",
            FailureTag::UserNotFound => "user_not_found",
            FailureTag::LoginRequired => "login_required",
            FailureTag::Timeout => "timeout",
            FailureTag::NoImagesFound => "no_images_found",
            FailureTag::NoProfilePic => "no_profile_pic",
            FailureTag::DownloadFailed => "download_failed",
            FailureTag::AllMethodsFailed => "all_methods_failed",
            FailureTag::InsufficientData => "insufficient_data",
        }
    }
}

impl std::fmt::Display for FailureTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolution mode requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// One representative image is enough.
    Shallow,
    /// Target `max_posts` post images plus engagement metadata.
    Deep { max_posts: usize },
}

impl ResolveMode {
    /// How many post images a strategy should try to download.
    #[must_use]
    pub fn image_budget(self) -> usize {
        match self {
            ResolveMode::Shallow => 3,
            ResolveMode::Deep { max_posts } => max_posts,
        }
    }
}

/// Point-in-time snapshot of a resolved profile.
///
/// Created fresh per request and never mutated after construction. A profile
/// carrying a failure tag guarantees nothing beyond `username`. The caption,
/// like-count and comment-count vectors are parallel to `post_images` and
/// only populated by deep-aware strategies that see post metadata; they are
/// empty otherwise.
#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub username: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub profile_pic_url: Option<String>,
    pub profile_pic: Option<Vec<u8>>,
    /// Post images in source ranking order, most recent first.
    pub post_images: Vec<Vec<u8>>,
    pub captions: Vec<Option<String>>,
    pub like_counts: Vec<Option<u64>>,
    pub comment_counts: Vec<Option<u64>>,
    pub follower_count: Option<u64>,
    pub following_count: Option<u64>,
    pub post_count: Option<u64>,
    pub is_private: bool,
    pub failure: Option<FailureTag>,
}

impl Profile {
    /// A terminal profile carrying only a failure tag.
    #[must_use]
    pub fn failed(username: impl Into<String>, tag: FailureTag) -> Self {
        Self {
            username: username.into(),
            is_private: true,
            failure: Some(tag),
            ..Self::default()
        }
    }

    /// Whether the profile carries any analyzable image bytes.
    #[must_use]
    pub fn has_images(&self) -> bool {
        self.profile_pic.is_some() || !self.post_images.is_empty()
    }

    /// Best image for single-image analysis: first post image, else the
    /// profile picture.
    #[must_use]
    pub fn primary_image(&self) -> Option<&[u8]> {
        self.post_images
            .first()
            .map(Vec::as_slice)
            .or(self.profile_pic.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_tags_serialize_as_snake_case() {
        let json = serde_json::to_string(&FailureTag::AllMethodsFailed).expect("serialize");
        assert_eq!(json, "\"all_methods_failed\"");
        assert_eq!(FailureTag::LoginRequired.as_str(), "login_required");
    }

    #[test]
    fn failed_profile_carries_only_the_tag() {
        let p = Profile::failed("someone", FailureTag::UserNotFound);
        assert_eq!(p.username, "someone");
        assert_eq!(p.failure, Some(FailureTag::UserNotFound));
        assert!(!p.has_images());
        assert!(p.primary_image().is_none());
    }

    #[test]
    fn primary_image_prefers_post_images() {
        let p = Profile {
            username: "someone".to_string(),
            profile_pic: Some(vec![1, 2, 3]),
            post_images: vec![vec![9, 9], vec![8, 8]],
            ..Profile::default()
        };
        assert_eq!(p.primary_image(), Some(&[9u8, 9u8][..]));
    }

    #[test]
    fn primary_image_falls_back_to_profile_pic() {
        let p = Profile {
            username: "someone".to_string(),
            profile_pic: Some(vec![1, 2, 3]),
            ..Profile::default()
        };
        assert_eq!(p.primary_image(), Some(&[1u8, 2u8, 3u8][..]));
    }

    #[test]
    fn image_budget_by_mode() {
        assert_eq!(ResolveMode::Shallow.image_budget(), 3);
        assert_eq!(ResolveMode::Deep { max_posts: 9 }.image_budget(), 9);
    }
}
