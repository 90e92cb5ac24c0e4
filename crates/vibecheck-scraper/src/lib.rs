//! Profile resolution pipeline for an uncooperative source.
//!
//! Turns a free-form profile URL or handle into a [`Profile`] snapshot by
//! trying extraction strategies in priority order (profile-info API,
//! embedded page JSON, mobile page, desktop page) and returning the first
//! acceptable result.

pub mod error;
pub mod fetch;
pub mod handle;
mod html_extract;
mod identity;
pub mod resolver;
mod strategies;
pub mod types;

pub use error::ScraperError;
pub use fetch::ImageFetcher;
pub use handle::extract_handle;
pub use resolver::{ProfileResolver, ScraperConfig};
pub use types::{FailureTag, Profile, ResolveMode};
