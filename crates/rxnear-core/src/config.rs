use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if any provided value fails to parse.
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
/// Returns `ConfigError` if any provided value fails to parse.
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

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if value <= 0.0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("must be positive, got {value}"),
            });
        }
        Ok(value)
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

    let env = parse_environment(&or_default("RXNEAR_ENV", "development"));
    let bind_addr = parse_addr("RXNEAR_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("RXNEAR_LOG_LEVEL", "info");

    let pharmacies_path = PathBuf::from(or_default(
        "RXNEAR_PHARMACIES_PATH",
        "./config/pharmacies.yaml",
    ));
    let medicines_path = PathBuf::from(or_default(
        "RXNEAR_MEDICINES_PATH",
        "./config/medicines.yaml",
    ));

    let default_radius_km = parse_f64("RXNEAR_DEFAULT_RADIUS_KM", "10")?;
    let max_radius_km = parse_f64("RXNEAR_MAX_RADIUS_KM", "50")?;
    let max_results_cap = parse_usize("RXNEAR_MAX_RESULTS_CAP", "50")?;
    let cache_ttl_secs = parse_u64("RXNEAR_CACHE_TTL_SECS", "300")?;

    let routing_base_url = lookup("RXNEAR_ROUTING_BASE_URL").ok();
    let routing_timeout_secs = parse_u64("RXNEAR_ROUTING_TIMEOUT_SECS", "10")?;
    let routing_max_retries = parse_u32("RXNEAR_ROUTING_MAX_RETRIES", "2")?;
    let routing_backoff_base_secs = parse_u64("RXNEAR_ROUTING_BACKOFF_BASE_SECS", "1")?;

    let rate_limit_max_requests = parse_usize("RXNEAR_RATE_LIMIT_MAX_REQUESTS", "120")?;
    let rate_limit_window_secs = parse_u64("RXNEAR_RATE_LIMIT_WINDOW_SECS", "60")?;

    if default_radius_km > max_radius_km {
        return Err(ConfigError::InvalidEnvVar {
            var: "RXNEAR_DEFAULT_RADIUS_KM".to_string(),
            reason: format!(
                "default radius {default_radius_km} exceeds maximum radius {max_radius_km}"
            ),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        pharmacies_path,
        medicines_path,
        default_radius_km,
        max_radius_km,
        max_results_cap,
        cache_ttl_secs,
        routing_base_url,
        routing_timeout_secs,
        routing_max_retries,
        routing_backoff_base_secs,
        rate_limit_max_requests,
        rate_limit_window_secs,
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
