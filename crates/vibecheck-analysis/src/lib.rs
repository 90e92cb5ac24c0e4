//! Analysis backend adapter: turns profile images (plus optional captions
//! and engagement metadata) into a normalized [`Report`].
//!
//! Two interchangeable backends sit behind [`AnalysisBackend`]: a
//! filesystem-mediated asynchronous bridge standing in for an out-of-band
//! worker, and a direct synchronous client for the external multimodal
//! provider. Selection happens once at startup from configuration.

mod backend;
mod bridge;
pub mod error;
mod json_repair;
mod prompt;
mod provider;
pub mod report;

pub use backend::AnalysisBackend;
pub use bridge::BridgeBackend;
pub use error::AnalysisError;
pub use json_repair::parse_report_text;
pub use provider::ProviderBackend;
pub use report::{engagement_rate, DeepInput, Report};
