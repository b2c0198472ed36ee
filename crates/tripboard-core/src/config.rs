use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_TOUR_API_BASE_URL: &str = "https://apis.data.go.kr/B551011/KorService2/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
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
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// `HashMap` instead of `set_var`/`remove_var`.
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

    let env = parse_environment(&or_default("TRIPBOARD_ENV", "development"))?;

    let bind_addr = or_default("TRIPBOARD_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("TRIPBOARD_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("TRIPBOARD_LOG_LEVEL", "info");

    // An empty key in `.env` is the same as no key.
    let tour_api_service_key = lookup("TOUR_API_SERVICE_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    let tour_api_base_url = or_default("TRIPBOARD_TOUR_API_BASE_URL", DEFAULT_TOUR_API_BASE_URL);
    if !tour_api_base_url.starts_with("http://") && !tour_api_base_url.starts_with("https://") {
        return Err(invalid(
            "TRIPBOARD_TOUR_API_BASE_URL",
            format!("expected an http(s) URL, got '{tour_api_base_url}'"),
        ));
    }

    let mobile_app = or_default("TRIPBOARD_MOBILE_APP", "tripboard");

    let request_timeout_secs = parse_u64("TRIPBOARD_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "TRIPBOARD_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let max_retries = parse_u32("TRIPBOARD_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("TRIPBOARD_RETRY_BACKOFF_BASE_MS", "500")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        tour_api_service_key,
        tour_api_base_url,
        mobile_app,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TRIPBOARD_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
