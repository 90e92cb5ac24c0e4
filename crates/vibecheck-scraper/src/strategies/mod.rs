//! Extraction strategies, tried in fixed priority order.
//!
//! Each strategy independently turns a handle into a [`Profile`] snapshot;
//! they differ in completeness and in which anti-bot countermeasures they
//! trip. The resolver folds over [`CHAIN`] and stops at the first result its
//! mode-specific acceptance predicate allows.

mod embedded_json;
mod page;
mod profile_api;

use crate::error::ScraperError;
use crate::fetch::ImageFetcher;
use crate::types::Profile;

/// Everything a strategy needs for one attempt.
pub(crate) struct StrategyContext<'a> {
    pub http: &'a reqwest::Client,
    pub fetcher: &'a ImageFetcher,
    pub base_url: &'a str,
    pub image_budget: usize,
    /// Deep attempts collect per-post metadata and throttle image downloads.
    pub deep: bool,
    pub delay_ms: (u64, u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strategy {
    /// Structured profile-info JSON endpoint with spoofed app identification.
    ProfileApi,
    /// JSON blobs embedded in the rendered profile page.
    EmbeddedJson,
    /// Profile page fetched under a mobile client identity.
    MobilePage,
    /// Profile page fetched under a desktop identity with extra polite delay.
    DesktopPage,
}

/// Priority order; earlier strategies yield more complete profiles.
pub(crate) const CHAIN: [Strategy; 4] = [
    Strategy::ProfileApi,
    Strategy::EmbeddedJson,
    Strategy::MobilePage,
    Strategy::DesktopPage,
];

impl Strategy {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Strategy::ProfileApi => "profile_api",
            Strategy::EmbeddedJson => "embedded_json",
            Strategy::MobilePage => "mobile_page",
            Strategy::DesktopPage => "desktop_page",
        }
    }

    /// Run one attempt. A returned `Profile` may still carry a failure tag
    /// (the strategy reached the source and classified the outcome); an
    /// `Err` means the strategy itself could not complete.
    pub(crate) async fn run(
        self,
        ctx: &StrategyContext<'_>,
        handle: &str,
    ) -> Result<Profile, ScraperError> {
        match self {
            Strategy::ProfileApi => profile_api::run(ctx, handle).await,
            Strategy::EmbeddedJson => embedded_json::run(ctx, handle).await,
            Strategy::MobilePage => page::run_mobile(ctx, handle).await,
            Strategy::DesktopPage => page::run_desktop(ctx, handle).await,
        }
    }
}
