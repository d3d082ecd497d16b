use crate::app_config::{AppConfig, Environment, TimeFormat};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("TLVIEW_ENV", "development"))?;

    let history_source = or_default("TLVIEW_HISTORY_SOURCE", "location-history.json");
    if history_source.trim().is_empty() {
        return Err(invalid("TLVIEW_HISTORY_SOURCE", "must not be empty".into()));
    }

    let timezone = or_default("TLVIEW_TIMEZONE", "UTC")
        .parse::<chrono_tz::Tz>()
        .map_err(|e| invalid("TLVIEW_TIMEZONE", e.to_string()))?;

    let raw_format = or_default("TLVIEW_TIME_FORMAT", "24h");
    let time_format = TimeFormat::parse(&raw_format).ok_or_else(|| {
        invalid(
            "TLVIEW_TIME_FORMAT",
            format!("expected 24h or 12h, got {raw_format:?}"),
        )
    })?;

    let bind_addr = or_default("TLVIEW_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("TLVIEW_BIND_ADDR", e.to_string()))?;

    let log_level = or_default("TLVIEW_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("TLVIEW_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("TLVIEW_USER_AGENT", "tlview/0.1 (timeline-viewer)");
    let max_retries = parse_u32("TLVIEW_MAX_RETRIES", "2")?;
    let retry_backoff_base_secs = parse_u64("TLVIEW_RETRY_BACKOFF_BASE_SECS", "1")?;

    let google_maps_api_key = lookup("GOOGLE_MAPS_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    let places_base_url = or_default("TLVIEW_PLACES_BASE_URL", "https://maps.googleapis.com");

    Ok(AppConfig {
        env,
        history_source,
        timezone,
        time_format,
        bind_addr,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        google_maps_api_key,
        places_base_url,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TLVIEW_ENV".to_string(),
            reason: format!("unknown environment {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
