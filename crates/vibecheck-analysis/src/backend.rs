//! Backend selection: exactly two variants, chosen once at startup.

use vibecheck_core::AppConfig;

use crate::bridge::BridgeBackend;
use crate::error::AnalysisError;
use crate::provider::ProviderBackend;
use crate::report::{DeepInput, Report};

/// The analysis capability contract, dispatching to whichever backend the
/// deployment selected. Stateless across calls apart from the bridge's
/// lazily created request/response directories.
pub enum AnalysisBackend {
    Bridge(BridgeBackend),
    Provider(ProviderBackend),
}

impl AnalysisBackend {
    /// Build the configured backend.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::MissingCredential`] if the direct provider is
    ///   selected without an API key.
    /// - [`AnalysisError::Http`] if the provider's HTTP client cannot be
    ///   constructed.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, AnalysisError> {
        if config.bridge_enabled {
            Ok(Self::Bridge(BridgeBackend::new(
                config.bridge_request_dir.clone(),
                config.bridge_response_dir.clone(),
                config.bridge_timeout_secs,
                config.bridge_poll_interval_secs,
            )))
        } else {
            let api_key = config
                .anthropic_api_key
                .as_deref()
                .ok_or(AnalysisError::MissingCredential)?;
            let provider = ProviderBackend::with_base_url(
                api_key,
                &config.provider_model,
                &config.provider_base_url,
            )?;
            Ok(Self::Provider(provider))
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bridge(_) => "bridge",
            Self::Provider(_) => "provider",
        }
    }

    /// Single-image analysis.
    ///
    /// # Errors
    ///
    /// Propagates the selected backend's errors; see [`BridgeBackend::analyze`]
    /// and [`ProviderBackend::analyze`].
    pub async fn analyze(
        &self,
        image: &[u8],
        language: &str,
        roast: bool,
    ) -> Result<Report, AnalysisError> {
        match self {
            Self::Bridge(bridge) => bridge.analyze(image, language, roast).await,
            Self::Provider(provider) => provider.analyze(image, language, roast).await,
        }
    }

    /// Multi-image analysis. A backend without the capability fails with
    /// [`AnalysisError::Unsupported`] rather than attempting a degraded call.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Unsupported`] for the bridge backend.
    /// - Otherwise, see [`ProviderBackend::analyze_deep`].
    pub async fn analyze_deep(
        &self,
        input: &DeepInput<'_>,
        language: &str,
        roast: bool,
    ) -> Result<Report, AnalysisError> {
        match self {
            Self::Bridge(bridge) => Err(bridge.analyze_deep_unsupported()),
            Self::Provider(provider) => provider.analyze_deep(input, language, roast).await,
        }
    }
}
