//! services/app/src/error.rs
//!
//! Defines the primary error type for the client application.

use crate::config::ConfigError;
use pawtrack_core::ports::PortError;

/// The primary error type for the `app` service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("{0}")]
    Port(#[from] PortError),

    /// Represents a failure while building the HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A form submission the backend or the validator refused.
    #[error("{0}")]
    Rejected(String),
}
