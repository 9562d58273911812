//! Configuration module
//!
//! Application settings are read from a TOML file
//! (default: `~/.config/parkhub/config.toml`); every section falls back
//! to sensible defaults when absent.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub security: SecurityConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests during shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite database file path
    pub path: String,
}

impl DatabaseSettings {
    /// SeaORM connection URL for the configured file.
    pub fn connection_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path)
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "./parkhub.db".to_string(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "super-secret-key-change-in-production".to_string(),
            jwt_expiration_hours: 24,
        }
    }
}

/// Default admin account, seeded on first start when no admin exists
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: "admin@parkhub.local".to_string(),
            password: "admin123".to_string(),
            name: "Administrator".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter directive, e.g. "info" or "parkhub=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        toml::from_str(&contents).map_err(ConfigError::Parse)
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("parkhub")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.database.path, "./parkhub.db");
        assert_eq!(cfg.security.jwt_expiration_hours, 24);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9999

            [admin]
            email = "ops@example.com"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9999);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.admin.email, "ops@example.com");
        assert_eq!(cfg.admin.name, "Administrator");
    }

    #[test]
    fn connection_url_uses_rwc_mode() {
        let db = DatabaseSettings {
            path: "/tmp/test.db".to_string(),
        };
        assert_eq!(db.connection_url(), "sqlite:///tmp/test.db?mode=rwc");
    }
}
