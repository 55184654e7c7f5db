use thiserror::Error;

use crate::app_config::AppConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

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

/// Load application configuration from environment variables already in the
/// process. Does NOT load `.env` files — useful for testing or when the
/// caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup
/// function, decoupled from the actual environment so it can be tested with
/// a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let parse_i32 = |var: &str, default: &str| -> Result<i32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;
    let media_upload_url = require("ATELIER_MEDIA_UPLOAD_URL")?;
    let media_host = require("ATELIER_MEDIA_HOST")?;

    let log_level = or_default("ATELIER_LOG_LEVEL", "info");
    let media_user_agent = or_default("ATELIER_MEDIA_USER_AGENT", "atelier-import/0.1");
    let request_timeout_secs = parse_u64("ATELIER_REQUEST_TIMEOUT_SECS", "30")?;
    let image_max_retries = parse_u32("ATELIER_IMAGE_MAX_RETRIES", "3")?;
    let image_retry_delay_ms = parse_u64("ATELIER_IMAGE_RETRY_DELAY_MS", "1000")?;
    let batch_size = parse_usize("ATELIER_IMPORT_BATCH_SIZE", "10")?;
    let default_stock_quantity = parse_i32("ATELIER_DEFAULT_STOCK_QUANTITY", "10")?;

    let db_max_connections = parse_u32("ATELIER_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("ATELIER_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("ATELIER_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        log_level,
        media_upload_url,
        media_host,
        media_user_agent,
        request_timeout_secs,
        image_max_retries,
        image_retry_delay_ms,
        batch_size,
        default_stock_quantity,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from<'a>(map: &'a HashMap<&'a str, &'a str>) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| map.get(key).map(ToString::to_string).ok_or(VarError::NotPresent)
    }

    fn minimal_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DATABASE_URL", "postgres://localhost/atelier"),
            (
                "ATELIER_MEDIA_UPLOAD_URL",
                "https://media.example.com/api/upload",
            ),
            ("ATELIER_MEDIA_HOST", "media.example.com"),
        ])
    }

    #[test]
    fn builds_with_defaults_from_minimal_env() {
        let env = minimal_env();
        let config = build_app_config(lookup_from(&env)).expect("config should build");

        assert_eq!(config.database_url, "postgres://localhost/atelier");
        assert_eq!(config.media_host, "media.example.com");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.image_max_retries, 3);
        assert_eq!(config.image_retry_delay_ms, 1000);
        assert_eq!(config.default_stock_quantity, 10);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let mut env = minimal_env();
        env.remove("DATABASE_URL");
        let err = build_app_config(lookup_from(&env)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "DATABASE_URL"));
    }

    #[test]
    fn missing_media_host_is_an_error() {
        let mut env = minimal_env();
        env.remove("ATELIER_MEDIA_HOST");
        let err = build_app_config(lookup_from(&env)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "ATELIER_MEDIA_HOST"));
    }

    #[test]
    fn overrides_are_parsed() {
        let mut env = minimal_env();
        env.insert("ATELIER_IMPORT_BATCH_SIZE", "25");
        env.insert("ATELIER_IMAGE_RETRY_DELAY_MS", "5");
        let config = build_app_config(lookup_from(&env)).expect("config should build");
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.image_retry_delay_ms, 5);
    }

    #[test]
    fn invalid_numeric_value_is_an_error() {
        let mut env = minimal_env();
        env.insert("ATELIER_IMPORT_BATCH_SIZE", "lots");
        let err = build_app_config(lookup_from(&env)).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "ATELIER_IMPORT_BATCH_SIZE")
        );
    }

    #[test]
    fn debug_redacts_database_url() {
        let env = minimal_env();
        let config = build_app_config(lookup_from(&env)).expect("config should build");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("[redacted]"));
        assert!(!rendered.contains("postgres://localhost/atelier"));
    }
}
