//! Database configuration module

use serde::{Deserialize, Serialize};

/// Default connection acquire timeout in seconds
const DEFAULT_CONNECT_TIMEOUT: u64 = 30;

/// Connection pool configuration for the MySQL store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Seconds to wait for a free connection before giving up
    pub connect_timeout: u64,

    /// Seconds an idle connection may sit in the pool
    pub idle_timeout: u64,

    /// Seconds before a pooled connection is recycled
    pub max_lifetime: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::from("mysql://localhost:3306/mailproof"),
            max_connections: 10,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            idle_timeout: 600,
            max_lifetime: 1800,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.url = url;
        }
        if let Some(max) = read_env_u32("DATABASE_MAX_CONNECTIONS") {
            config.max_connections = max;
        }
        if let Some(timeout) = read_env_u64("DATABASE_CONNECT_TIMEOUT") {
            config.connect_timeout = timeout;
        }
        config
    }

    /// Set the maximum number of pooled connections
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the connection acquire timeout in seconds
    pub fn with_connect_timeout(mut self, seconds: u64) -> Self {
        self.connect_timeout = seconds;
        self
    }
}

fn read_env_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn read_env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
    }

    #[test]
    fn test_database_config_builder() {
        let config = DatabaseConfig::new("mysql://db:3306/mailproof")
            .with_max_connections(4)
            .with_connect_timeout(5);
        assert_eq!(config.url, "mysql://db:3306/mailproof");
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.connect_timeout, 5);
    }
}
