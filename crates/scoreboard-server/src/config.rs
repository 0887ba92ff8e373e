//! Runtime configuration, read from the environment.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Pool size for file databases. In-memory databases always use one
    /// connection.
    pub db_max_connections: u32,
    /// How long a writer waits on SQLite's lock before giving up.
    pub db_busy_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite:scoreboard.db?mode=rwc".to_string());
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 8080)?;
        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?;
        let busy_secs = parse_or(&lookup, "DB_BUSY_TIMEOUT_SECS", 5)?;

        Ok(Config {
            database_url,
            host,
            port,
            db_max_connections,
            db_busy_timeout: Duration::from_secs(busy_secs),
        })
    }

    /// Defaults pointed at the given database, for tests and tools.
    pub fn for_database(database_url: &str) -> Self {
        Config {
            database_url: database_url.to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            db_max_connections: 5,
            db_busy_timeout: Duration::from_secs(5),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, "sqlite:scoreboard.db?mode=rwc");
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.db_busy_timeout, Duration::from_secs(5));
        assert!(!config.is_in_memory());
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("PORT", "9000"),
            ("DB_BUSY_TIMEOUT_SECS", "1"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.db_busy_timeout, Duration::from_secs(1));
        assert!(config.is_in_memory());
    }

    #[test]
    fn bad_port_is_reported() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}
