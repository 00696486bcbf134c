//! Configuration management with validation and defaults
//!
//! Loaded from TOML; every section and field has a default so a partial file
//! (or no file at all) is valid.

use crate::{
    api::security::DEFAULT_REALM,
    auth::DEFAULT_ITERATIONS,
    games::{table::DEFAULT_STAKE, WheelVariant},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path, time::Duration};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouletteConfig {
    pub server: ServerConfig,
    pub table: TableConfig,
    pub wheel: WheelConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// HTTP adapter settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub allowed_origins: Vec<String>,
    pub max_body_bytes: usize,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            allowed_origins: vec!["*".to_string()],
            max_body_bytes: 64 * 1024,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub initial_stake: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_stake: DEFAULT_STAKE,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    pub variant: WheelVariant,
    /// Fixed seed for reproducible spins; entropy when absent
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub realm: String,
    pub iterations: u32,
    pub users: Vec<UserEntry>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            realm: DEFAULT_REALM.to_string(),
            iterations: DEFAULT_ITERATIONS,
            users: Vec::new(),
        }
    }
}

/// A user to register at startup
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "roulette_service=info,roulette_server=info,tower_http=info".to_string(),
        }
    }
}

impl RouletteConfig {
    /// Local play: seeded European wheel and a demo account
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                ..Default::default()
            },
            wheel: WheelConfig {
                variant: WheelVariant::European,
                seed: Some(42),
            },
            auth: AuthConfig {
                users: vec![UserEntry {
                    username: "demo".to_string(),
                    password: "demo".to_string(),
                }],
                ..Default::default()
            },
            logging: LoggingConfig {
                filter: "roulette_service=debug,roulette_server=debug,tower_http=debug".to_string(),
            },
            ..Default::default()
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Validate configuration for logical consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue("server.port must be > 0".to_string()));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "server.request_timeout_secs must be > 0".to_string(),
            ));
        }
        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::InvalidValue(
                "server.max_body_bytes must be > 0".to_string(),
            ));
        }
        if !self.table.initial_stake.is_finite() {
            return Err(ConfigError::InvalidValue(
                "table.initial_stake must be a finite number".to_string(),
            ));
        }
        if self.auth.iterations == 0 {
            return Err(ConfigError::InvalidValue("auth.iterations must be > 0".to_string()));
        }

        let mut seen = HashSet::new();
        for user in &self.auth.users {
            if user.username.is_empty() {
                return Err(ConfigError::InvalidValue(
                    "auth.users entries need a non-empty username".to_string(),
                ));
            }
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "auth.users lists '{}' more than once",
                    user.username
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration from {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}
