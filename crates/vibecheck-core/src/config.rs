use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false, got \"{other}\""),
            }),
        }
    };

    let env = parse_environment(&or_default("VIBECHECK_ENV", "development"));
    let bind_addr = parse_addr("VIBECHECK_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("VIBECHECK_LOG_LEVEL", "info");
    let daily_free_limit = parse_u32("VIBECHECK_DAILY_FREE_LIMIT", "3")?;

    let bridge_enabled = parse_bool("VIBECHECK_BRIDGE_ENABLED", "true")?;
    let bridge_request_dir =
        PathBuf::from(or_default("VIBECHECK_BRIDGE_REQUEST_DIR", "./bridge/requests"));
    let bridge_response_dir = PathBuf::from(or_default(
        "VIBECHECK_BRIDGE_RESPONSE_DIR",
        "./bridge/responses",
    ));
    let bridge_timeout_secs = parse_u64("VIBECHECK_BRIDGE_TIMEOUT_SECS", "300")?;
    let bridge_poll_interval_secs = parse_u64("VIBECHECK_BRIDGE_POLL_INTERVAL_SECS", "2")?;

    let anthropic_api_key = lookup("ANTHROPIC_API_KEY").ok().filter(|k| !k.is_empty());
    let provider_base_url = or_default(
        "VIBECHECK_PROVIDER_BASE_URL",
        "https://api.anthropic.com/v1",
    );
    let provider_model = or_default("VIBECHECK_PROVIDER_MODEL", "claude-3-haiku-20240307");

    // The direct provider cannot run without a credential; fail at startup
    // rather than on the first analysis call.
    if !bridge_enabled && anthropic_api_key.is_none() {
        return Err(ConfigError::MissingEnvVar("ANTHROPIC_API_KEY".to_string()));
    }

    let scraper_base_url = or_default("VIBECHECK_SCRAPER_BASE_URL", "https://www.instagram.com");
    let scraper_timeout_secs = parse_u64("VIBECHECK_SCRAPER_TIMEOUT_SECS", "10")?;
    let scraper_deep_timeout_secs = parse_u64("VIBECHECK_SCRAPER_DEEP_TIMEOUT_SECS", "20")?;
    let scraper_max_posts = parse_usize("VIBECHECK_SCRAPER_MAX_POSTS", "9")?;
    let scraper_delay_ms_min = parse_u64("VIBECHECK_SCRAPER_DELAY_MS_MIN", "200")?;
    let scraper_delay_ms_max = parse_u64("VIBECHECK_SCRAPER_DELAY_MS_MAX", "600")?;

    if scraper_delay_ms_max < scraper_delay_ms_min {
        return Err(ConfigError::InvalidEnvVar {
            var: "VIBECHECK_SCRAPER_DELAY_MS_MAX".to_string(),
            reason: format!("must be >= VIBECHECK_SCRAPER_DELAY_MS_MIN ({scraper_delay_ms_min})"),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        daily_free_limit,
        bridge_enabled,
        bridge_request_dir,
        bridge_response_dir,
        bridge_timeout_secs,
        bridge_poll_interval_secs,
        anthropic_api_key,
        provider_base_url,
        provider_model,
        scraper_base_url,
        scraper_timeout_secs,
        scraper_deep_timeout_secs,
        scraper_max_posts,
        scraper_delay_ms_min,
        scraper_delay_ms_max,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
