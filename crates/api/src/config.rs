//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Default bind address.
pub const DEFAULT_ADDR: &str = "0.0.0.0:8000";

/// Default SQLite database URL.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:reminders.db?mode=rwc";

/// Default number of reminders on the home feed.
pub const DEFAULT_HOME_FEED_LIMIT: i64 = 2;

/// Default request body limit; inline audio is capped at 20 MB upstream.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Reminders returned by the home feed.
    pub home_feed_limit: i64,
    /// Maximum accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `REMINDERS_ADDR` | Server bind address | `0.0.0.0:8000` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:reminders.db?mode=rwc` |
    /// | `HOME_FEED_LIMIT` | Reminders on the home feed | `2` |
    /// | `MAX_UPLOAD_BYTES` | Request body limit | `20971520` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("REMINDERS_ADDR")
            .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("SQLITE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let home_feed_limit = match env::var("HOME_FEED_LIMIT") {
            Ok(value) => value
                .parse::<i64>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidNumber("HOME_FEED_LIMIT", value))?,
            Err(_) => DEFAULT_HOME_FEED_LIMIT,
        };

        let max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidNumber("MAX_UPLOAD_BYTES", value))?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            addr,
            database_url,
            home_feed_limit,
            max_upload_bytes,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid REMINDERS_ADDR format")]
    InvalidAddr,

    #[error("{0} must be a positive integer, got {1:?}")]
    InvalidNumber(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-global, so every scenario runs under one lock.
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_vars() {
            env::remove_var("REMINDERS_ADDR");
            env::remove_var("SQLITE_PATH");
            env::remove_var("HOME_FEED_LIMIT");
            env::remove_var("MAX_UPLOAD_BYTES");
        }

        clear_vars();
        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.to_string(), DEFAULT_ADDR);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.home_feed_limit, 2);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);

        env::set_var("REMINDERS_ADDR", "127.0.0.1:9000");
        env::set_var("SQLITE_PATH", "sqlite::memory:");
        env::set_var("HOME_FEED_LIMIT", "5");
        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.home_feed_limit, 5);

        env::set_var("HOME_FEED_LIMIT", "0");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidNumber("HOME_FEED_LIMIT", _))
        ));

        clear_vars();
        env::set_var("REMINDERS_ADDR", "not an address");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidAddr)));

        clear_vars();
    }
}
