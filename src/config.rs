//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/car-rental/config.toml`).
//! Every section and field is optional; a missing file yields the defaults.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//!
//! [database]
//! path = "/var/lib/car-rental/car_rental.db"
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [session]
//! idle_timeout_secs = 3600
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::crypto::{DEFAULT_COST, MAX_COST, MIN_COST};
use crate::infrastructure::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration validation failed: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
    /// Serve Prometheus metrics at `/metrics`
    pub metrics_enabled: bool,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            shutdown_timeout: 30,
            metrics_enabled: true,
        }
    }
}

impl ServerSection {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    /// Full connection URL; takes precedence over `path`
    pub url: Option<String>,
    /// SQLite file, created if missing
    pub path: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: None,
            path: "car_rental.db".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("sqlite://{}?mode=rwc", self.path),
        }
    }

    pub fn to_database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.connection_url(),
            max_connections: self.max_connections,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Filter directive; `RUST_LOG` wins when set
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    pub cookie_name: String,
    /// Add the `Secure` attribute to the session cookie
    pub secure: bool,
    /// Sessions unused for this many seconds are logged out
    pub idle_timeout_secs: u64,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            cookie_name: "car_rental_sid".to_string(),
            secure: false,
            idle_timeout_secs: 24 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub bcrypt_cost: u32,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    /// Insert demo branches, cars and extras into an empty catalog
    pub seed_demo_data: bool,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub session: SessionSection,
    pub security: SecuritySection,
    pub catalog: CatalogSection,
}

impl AppConfig {
    /// Load the config file at `path`, falling back to defaults when it
    /// does not exist. `DATABASE_URL` overrides the database URL.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml(&raw)?
        } else {
            Self::default()
        };

        config.apply_database_url(std::env::var("DATABASE_URL").ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_database_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.database.url = Some(url);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be > 0".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be > 0".to_string(),
            ));
        }
        if !matches!(self.logging.format.to_lowercase().as_str(), "text" | "json") {
            return Err(ConfigError::Invalid(format!(
                "logging.format must be \"text\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        if self.session.cookie_name.is_empty()
            || !self
                .session
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ConfigError::Invalid(format!(
                "session.cookie_name \"{}\" is not a valid cookie name",
                self.session.cookie_name
            )));
        }
        if self.session.idle_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "session.idle_timeout_secs must be > 0".to_string(),
            ));
        }
        if !(MIN_COST..=MAX_COST).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "security.bcrypt_cost must be between {} and {}",
                MIN_COST, MAX_COST
            )));
        }
        Ok(())
    }
}

/// `~/.config/car-rental/config.toml`, or `./config.toml` when the platform
/// has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("car-rental").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.address(), "0.0.0.0:3000");
        assert_eq!(
            config.database.connection_url(),
            "sqlite://car_rental.db?mode=rwc"
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 8080

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.session.cookie_name, "car_rental_sid");
        assert!(config.catalog.seed_demo_data);
    }

    #[test]
    fn url_wins_over_path() {
        let mut config = AppConfig::default();
        config.database.path = "/tmp/x.db".into();
        assert_eq!(config.database.connection_url(), "sqlite:///tmp/x.db?mode=rwc");

        config.apply_database_url(Some("sqlite::memory:".into()));
        assert_eq!(config.database.connection_url(), "sqlite::memory:");

        config.apply_database_url(Some("  ".into()));
        assert_eq!(config.database.connection_url(), "sqlite::memory:");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = AppConfig::default();
        config.logging.format = "yaml".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.session.cookie_name = "bad name;".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.security.bcrypt_cost = 2;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.session.idle_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            AppConfig::from_toml("[server\nport = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reads_the_file() {
        let dir = std::env::temp_dir().join(format!("car-rental-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(
            &path,
            "[server]\nport = 4321\n\n[session]\nsecure = true\nidle_timeout_secs = 600\n",
        )
        .unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.server.port, 4321);
        assert!(loaded.session.secure);
        assert_eq!(loaded.session.idle_timeout_secs, 600);

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir()
            .join(format!("car-rental-{}", uuid::Uuid::new_v4()))
            .join("config.toml");
        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.server, ServerSection::default());
        assert_eq!(loaded.session, SessionSection::default());
    }

    #[test]
    fn default_path_ends_with_app_dir() {
        let path = default_config_path();
        assert!(path.ends_with("car-rental/config.toml") || path.ends_with("config.toml"));
    }
}
