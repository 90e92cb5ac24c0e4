//! Normalized analysis output and deep-mode input bundle.

use serde::{Deserialize, Serialize};

fn default_label() -> String {
    "Unknown".to_string()
}

fn default_icon() -> String {
    "\u{2728}".to_string() // ✨
}

/// Normalized structured output of an analysis backend.
///
/// Known fields are tolerant of omission (backends differ in which
/// commentary fields they emit per mode); everything else the backend
/// returns survives untouched in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    #[serde(default = "default_label")]
    pub vibe_type: String,
    #[serde(default = "default_icon")]
    pub vibe_emoji: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roast: Option<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub green_flags: Vec<String>,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub conversation_starters: Vec<String>,
    #[serde(default)]
    pub energy: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_rate: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Inputs for multi-image analysis. The caption and count slices are
/// parallel to `images`; empty slices mean the metadata is unavailable.
#[derive(Debug, Clone, Copy)]
pub struct DeepInput<'a> {
    pub images: &'a [Vec<u8>],
    pub captions: &'a [Option<String>],
    pub like_counts: &'a [Option<u64>],
    pub comment_counts: &'a [Option<u64>],
    pub follower_count: Option<u64>,
    pub bio: Option<&'a str>,
}

/// Engagement rate as a percentage:
/// `(Σlikes + Σcomments) / image_count / follower_count × 100`.
///
/// Any zero divisor yields `0.0` rather than a division error.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn engagement_rate(
    like_counts: &[Option<u64>],
    comment_counts: &[Option<u64>],
    image_count: usize,
    follower_count: Option<u64>,
) -> f64 {
    let followers = follower_count.unwrap_or(0);
    if image_count == 0 || followers == 0 {
        return 0.0;
    }
    let likes: u64 = like_counts.iter().flatten().sum();
    let comments: u64 = comment_counts.iter().flatten().sum();
    (likes + comments) as f64 / image_count as f64 / followers as f64 * 100.0
}
