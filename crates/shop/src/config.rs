//! Shop configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOP_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL` when unset, e.g. under a platform-provided attach)
//!
//! ## Optional
//! - `SHOP_MAX_DB_CONNECTIONS` - Connection pool size (default: 10)

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_MAX_DB_CONNECTIONS: u32 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Shop application configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// Maximum number of pooled database connections
    pub max_db_connections: u32,
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the database URL is missing or the pool size
    /// is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SHOP_DATABASE_URL")?;
        let max_db_connections = parse_max_connections(
            "SHOP_MAX_DB_CONNECTIONS",
            std::env::var("SHOP_MAX_DB_CONNECTIONS").ok(),
        )?;

        Ok(Self {
            database_url,
            max_db_connections,
        })
    }
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Parse a pool size value, defaulting when the variable is unset.
fn parse_max_connections(key: &str, raw: Option<String>) -> Result<u32, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_MAX_DB_CONNECTIONS);
    };

    let parsed = raw
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if parsed == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "pool size must be at least 1".to_string(),
        ));
    }

    Ok(parsed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_max_connections_default() {
        let value = parse_max_connections("TEST_VAR", None).unwrap();
        assert_eq!(value, DEFAULT_MAX_DB_CONNECTIONS);
    }

    #[test]
    fn test_parse_max_connections_explicit() {
        let value = parse_max_connections("TEST_VAR", Some("25".to_string())).unwrap();
        assert_eq!(value, 25);
    }

    #[test]
    fn test_parse_max_connections_rejects_zero() {
        let result = parse_max_connections("TEST_VAR", Some("0".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_parse_max_connections_rejects_garbage() {
        let result = parse_max_connections("TEST_VAR", Some("lots".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }
}
