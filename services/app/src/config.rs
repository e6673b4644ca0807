//! services/app/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use tracing::Level;
use uuid::Uuid;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// A session handed to the client out of band (e.g. by a prior sign-in).
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub access_token: String,
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub log_level: Level,
    pub session: Option<SessionConfig>,
    pub storage_path: PathBuf,
    pub geocoder_url: String,
    pub device_position: Option<(f64, f64)>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Backend ---
        let api_base_url = lookup("API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .ok_or_else(|| ConfigError::MissingVar("API_BASE_URL".to_string()))?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Session (optional, both parts required together) ---
        let session = match (lookup("SESSION_ACCESS_TOKEN"), lookup("SESSION_USER_ID")) {
            (Some(access_token), Some(user_id)) => {
                let user_id = Uuid::parse_str(&user_id).map_err(|e| {
                    ConfigError::InvalidValue("SESSION_USER_ID".to_string(), e.to_string())
                })?;
                Some(SessionConfig {
                    access_token,
                    user_id,
                    email: lookup("SESSION_EMAIL"),
                })
            }
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingVar("SESSION_USER_ID".to_string())),
            (None, Some(_)) => {
                return Err(ConfigError::MissingVar("SESSION_ACCESS_TOKEN".to_string()))
            }
        };

        // --- Device ---
        let storage_path = lookup("STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./.pawtrack/storage.json"));

        let geocoder_url = lookup("GEOCODER_URL")
            .unwrap_or_else(|| "https://nominatim.openstreetmap.org".to_string());

        let device_position = match (lookup("DEVICE_LATITUDE"), lookup("DEVICE_LONGITUDE")) {
            (Some(lat), Some(lon)) => Some((
                parse_coordinate("DEVICE_LATITUDE", &lat)?,
                parse_coordinate("DEVICE_LONGITUDE", &lon)?,
            )),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::MissingVar("DEVICE_LONGITUDE".to_string())),
            (None, Some(_)) => return Err(ConfigError::MissingVar("DEVICE_LATITUDE".to_string())),
        };

        Ok(Self {
            api_base_url,
            log_level,
            session,
            storage_path,
            geocoder_url,
            device_position,
        })
    }
}

fn parse_coordinate(var: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| ConfigError::InvalidValue(var.to_string(), e.to_string()))
}
