use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub daily_free_limit: u32,
    /// When true the analysis backend is the filesystem bridge; otherwise the
    /// direct provider client is used and `anthropic_api_key` must be set.
    pub bridge_enabled: bool,
    pub bridge_request_dir: PathBuf,
    pub bridge_response_dir: PathBuf,
    pub bridge_timeout_secs: u64,
    pub bridge_poll_interval_secs: u64,
    pub anthropic_api_key: Option<String>,
    pub provider_base_url: String,
    pub provider_model: String,
    pub scraper_base_url: String,
    pub scraper_timeout_secs: u64,
    pub scraper_deep_timeout_secs: u64,
    pub scraper_max_posts: usize,
    pub scraper_delay_ms_min: u64,
    pub scraper_delay_ms_max: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("daily_free_limit", &self.daily_free_limit)
            .field("bridge_enabled", &self.bridge_enabled)
            .field("bridge_request_dir", &self.bridge_request_dir)
            .field("bridge_response_dir", &self.bridge_response_dir)
            .field("bridge_timeout_secs", &self.bridge_timeout_secs)
            .field("bridge_poll_interval_secs", &self.bridge_poll_interval_secs)
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("provider_base_url", &self.provider_base_url)
            .field("provider_model", &self.provider_model)
            .field("scraper_base_url", &self.scraper_base_url)
            .field("scraper_timeout_secs", &self.scraper_timeout_secs)
            .field("scraper_deep_timeout_secs", &self.scraper_deep_timeout_secs)
            .field("scraper_max_posts", &self.scraper_max_posts)
            .field("scraper_delay_ms_min", &self.scraper_delay_ms_min)
            .field("scraper_delay_ms_max", &self.scraper_delay_ms_max)
            .finish()
    }
}
