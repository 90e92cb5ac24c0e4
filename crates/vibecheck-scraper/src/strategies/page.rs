//! Page-rendering strategies: mobile and desktop client identities over the
//! shared HTML-extraction routine.

use super::StrategyContext;
use crate::error::ScraperError;
use crate::fetch::fetch_html;
use crate::html_extract::{extract_profile, polite_delay, HtmlExtractOptions};
use crate::identity::{self, ClientIdentity, DESKTOP_IDENTITIES, MOBILE_IDENTITIES};
use crate::types::Profile;

pub(super) async fn run_mobile(
    ctx: &StrategyContext<'_>,
    handle: &str,
) -> Result<Profile, ScraperError> {
    let identity = identity::pick(MOBILE_IDENTITIES);
    run_page(ctx, handle, identity).await
}

pub(super) async fn run_desktop(
    ctx: &StrategyContext<'_>,
    handle: &str,
) -> Result<Profile, ScraperError> {
    // Last strategy in the chain; an extra polite delay lowers the block
    // rate after the earlier attempts have already touched the source.
    polite_delay(ctx.delay_ms).await;
    let identity = identity::pick(DESKTOP_IDENTITIES);
    run_page(ctx, handle, identity).await
}

async fn run_page(
    ctx: &StrategyContext<'_>,
    handle: &str,
    identity: ClientIdentity,
) -> Result<Profile, ScraperError> {
    let url = format!("{}/{handle}/", ctx.base_url);
    let html = fetch_html(ctx.http, &url, identity).await?;

    let opts = HtmlExtractOptions {
        image_budget: ctx.image_budget,
        delay_ms: if ctx.deep { ctx.delay_ms } else { (0, 0) },
        user_agent: identity.user_agent,
    };
    extract_profile(ctx.fetcher, handle, &html, &opts).await
}
