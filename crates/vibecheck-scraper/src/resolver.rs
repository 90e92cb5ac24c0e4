//! Orchestrates the strategy chain and applies the fallback policy.

use std::time::Duration;

use crate::error::ScraperError;
use crate::fetch::ImageFetcher;
use crate::handle::extract_handle;
use crate::strategies::{StrategyContext, CHAIN};
use crate::types::{FailureTag, Profile, ResolveMode};

/// Minimum post-image count for a strategy result to be accepted as the
/// deep result.
const DEEP_MIN_IMAGES: usize = 3;

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub deep_timeout_secs: u64,
    pub max_posts: usize,
    /// Inter-request delay range in milliseconds for deep-mode downloads and
    /// the desktop strategy's polite pause. `(0, 0)` disables delays.
    pub delay_ms: (u64, u64),
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.instagram.com".to_string(),
            timeout_secs: 10,
            deep_timeout_secs: 20,
            max_posts: 9,
            delay_ms: (200, 600),
        }
    }
}

impl ScraperConfig {
    #[must_use]
    pub fn from_app_config(config: &vibecheck_core::AppConfig) -> Self {
        Self {
            base_url: config.scraper_base_url.clone(),
            timeout_secs: config.scraper_timeout_secs,
            deep_timeout_secs: config.scraper_deep_timeout_secs,
            max_posts: config.scraper_max_posts,
            delay_ms: (config.scraper_delay_ms_min, config.scraper_delay_ms_max),
        }
    }
}

/// Resolves a free-form profile identifier to a [`Profile`] snapshot.
///
/// Shallow resolution returns the first strategy result with no failure tag.
/// Deep resolution additionally requires at least [`DEEP_MIN_IMAGES`] post
/// images; when the deep chain is exhausted it silently falls back to the
/// shallow path, so deep metadata is simply absent rather than an error.
/// The resolver never returns an `Err`: terminal failures surface as tagged
/// profiles.
pub struct ProfileResolver {
    config: ScraperConfig,
    http: reqwest::Client,
    fetcher: ImageFetcher,
    deep_fetcher: ImageFetcher,
}

impl ProfileResolver {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if an underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: ScraperConfig) -> Result<Self, ScraperError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        let referer = format!("{}/", config.base_url.trim_end_matches('/'));
        let fetcher = ImageFetcher::new(config.timeout_secs, referer.clone())?;
        let deep_fetcher = ImageFetcher::new(config.deep_timeout_secs, referer)?;
        Ok(Self {
            config,
            http,
            fetcher,
            deep_fetcher,
        })
    }

    /// Resolve `input` (profile URL or bare handle) in the given mode.
    pub async fn resolve(&self, input: &str, mode: ResolveMode) -> Profile {
        let Some(handle) = extract_handle(input) else {
            return Profile::failed("", FailureTag::InvalidUsername);
        };

        match mode {
            ResolveMode::Shallow => self.resolve_shallow(&handle).await,
            ResolveMode::Deep { .. } => {
                if let Some(profile) = self.try_deep(&handle, mode).await {
                    return profile;
                }
                tracing::info!(
                    handle = %handle,
                    "deep chain exhausted; falling back to shallow resolution"
                );
                self.resolve_shallow(&handle).await
            }
        }
    }

    async fn resolve_shallow(&self, handle: &str) -> Profile {
        let ctx = self.context(ResolveMode::Shallow);
        let mut all_timed_out = true;

        for strategy in CHAIN {
            match strategy.run(&ctx, handle).await {
                Ok(profile) if profile.failure.is_none() => {
                    tracing::info!(
                        strategy = strategy.name(),
                        handle = %handle,
                        images = profile.post_images.len(),
                        "profile resolved"
                    );
                    return profile;
                }
                Ok(profile) => {
                    all_timed_out = false;
                    let tag = profile.failure.unwrap_or(FailureTag::AllMethodsFailed);
                    tracing::debug!(
                        strategy = strategy.name(),
                        handle = %handle,
                        tag = %tag,
                        "strategy classified a failure"
                    );
                }
                Err(e) => {
                    if !e.is_timeout() {
                        all_timed_out = false;
                    }
                    tracing::warn!(
                        strategy = strategy.name(),
                        handle = %handle,
                        error = %e,
                        "strategy failed"
                    );
                }
            }
        }

        let tag = if all_timed_out {
            FailureTag::Timeout
        } else {
            FailureTag::AllMethodsFailed
        };
        Profile::failed(handle, tag)
    }

    async fn try_deep(&self, handle: &str, mode: ResolveMode) -> Option<Profile> {
        let ctx = self.deep_context(mode);

        for strategy in CHAIN {
            match strategy.run(&ctx, handle).await {
                Ok(profile) if accepts_deep(&profile) => {
                    tracing::info!(
                        strategy = strategy.name(),
                        handle = %handle,
                        images = profile.post_images.len(),
                        "deep profile resolved"
                    );
                    return Some(profile);
                }
                Ok(profile) if profile.failure.is_none() => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        handle = %handle,
                        images = profile.post_images.len(),
                        "too few images for deep analysis; trying next strategy"
                    );
                }
                Ok(profile) => {
                    let tag = profile.failure.unwrap_or(FailureTag::AllMethodsFailed);
                    tracing::debug!(
                        strategy = strategy.name(),
                        handle = %handle,
                        tag = %tag,
                        "deep strategy classified a failure"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        strategy = strategy.name(),
                        handle = %handle,
                        error = %e,
                        "deep strategy failed"
                    );
                }
            }
        }

        None
    }

    fn context(&self, mode: ResolveMode) -> StrategyContext<'_> {
        StrategyContext {
            http: &self.http,
            fetcher: &self.fetcher,
            base_url: self.config.base_url.trim_end_matches('/'),
            image_budget: mode.image_budget(),
            deep: false,
            delay_ms: self.config.delay_ms,
        }
    }

    fn deep_context(&self, mode: ResolveMode) -> StrategyContext<'_> {
        StrategyContext {
            http: &self.http,
            fetcher: &self.deep_fetcher,
            base_url: self.config.base_url.trim_end_matches('/'),
            image_budget: mode.image_budget().min(self.config.max_posts),
            deep: true,
            delay_ms: self.config.delay_ms,
        }
    }
}

/// Deep-mode acceptance predicate.
fn accepts_deep(profile: &Profile) -> bool {
    profile.failure.is_none() && profile.post_images.len() >= DEEP_MIN_IMAGES
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_resolver() -> ProfileResolver {
        ProfileResolver::new(ScraperConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            delay_ms: (0, 0),
            ..ScraperConfig::default()
        })
        .expect("resolver construction should not fail")
    }

    #[tokio::test]
    async fn unparsable_input_short_circuits_without_network() {
        // Port 9 (discard) is never contacted: handle extraction fails first.
        let resolver = test_resolver();
        let profile = resolver
            .resolve("https://example.com/p/abc123", ResolveMode::Shallow)
            .await;
        assert_eq!(profile.failure, Some(FailureTag::InvalidUsername));
        assert!(profile.username.is_empty());
    }

    #[test]
    fn deep_acceptance_requires_three_images() {
        let mut profile = Profile {
            username: "someone".to_string(),
            post_images: vec![vec![0u8; 4]; 2],
            ..Profile::default()
        };
        assert!(!accepts_deep(&profile));
        profile.post_images.push(vec![0u8; 4]);
        assert!(accepts_deep(&profile));
        profile.failure = Some(FailureTag::LoginRequired);
        assert!(!accepts_deep(&profile));
    }
}
