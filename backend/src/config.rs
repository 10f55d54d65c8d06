//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. The configuration is built once at startup and
//! handed to the router through [`crate::api::AppState`].

use sqlx::mysql::MySqlConnectOptions;
use std::env;
use std::fmt;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Backing store configuration
    pub database: DatabaseConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// MySQL connection settings
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Database host name
    pub host: String,
    /// Database port
    pub port: u16,
    /// Login user
    pub user: String,
    /// Login password
    pub password: String,
    /// Schema holding the `game_sales` table
    pub name: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

// Keep the password out of startup logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Missing keys and unparseable numbers fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            server: ServerConfig {
                port: lookup("PORT")
                    .and_then(|p| p.trim().parse().ok())
                    .unwrap_or(5000),
                host: string("HOST", "0.0.0.0"),
            },
            database: DatabaseConfig {
                host: string("DB_HOST", "mysql-db"),
                port: lookup("DB_PORT")
                    .and_then(|p| p.trim().parse().ok())
                    .unwrap_or(3306),
                user: string("DB_USER", "root"),
                password: string("DB_PASSWORD", "123456"),
                name: string("DB_NAME", "db_project_test"),
                max_connections: lookup("DB_MAX_CONNECTIONS")
                    .and_then(|n| n.trim().parse().ok())
                    .filter(|n: &u32| *n > 0)
                    .unwrap_or(5),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DatabaseConfig {
    /// Connection options for the sqlx MySQL driver
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}
