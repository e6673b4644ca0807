//! services/app/src/adapters/device.rs
//!
//! Stand-ins for the device collaborators when the client runs headless:
//! a fixed position, a photo chosen by path, and alerts written to the log.

use std::path::PathBuf;

use async_trait::async_trait;
use pawtrack_core::domain::Coordinates;
use pawtrack_core::ports::{ImagePicker, LocationProvider, Notifier, PortError, PortResult};
use tracing::warn;

/// Reports a configured position. With no position configured, location
/// access counts as refused.
#[derive(Clone, Debug, Default)]
pub struct ConfiguredPosition {
    position: Option<Coordinates>,
}

impl ConfiguredPosition {
    pub fn new(position: Option<(f64, f64)>) -> Self {
        Self {
            position: position.map(|(latitude, longitude)| Coordinates {
                latitude,
                longitude,
            }),
        }
    }
}

#[async_trait]
impl LocationProvider for ConfiguredPosition {
    async fn request_foreground_permission(&self) -> PortResult<bool> {
        Ok(self.position.is_some())
    }

    async fn current_position(&self) -> PortResult<Coordinates> {
        self.position
            .ok_or_else(|| PortError::Unexpected("No device position configured".to_string()))
    }
}

/// "Picks" a photo that was named up front, e.g. on the command line.
#[derive(Clone, Debug, Default)]
pub struct PathImagePicker {
    path: Option<PathBuf>,
}

impl PathImagePicker {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ImagePicker for PathImagePicker {
    async fn request_library_permission(&self) -> PortResult<bool> {
        Ok(true)
    }

    async fn pick_image(&self) -> PortResult<Option<String>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };
        let absolute = tokio::fs::canonicalize(path).await.map_err(|e| {
            PortError::Unexpected(format!("Cannot open {}: {}", path.display(), e))
        })?;
        Ok(Some(absolute.to_string_lossy().into_owned()))
    }
}

/// Writes alerts to the log.
#[derive(Clone, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn alert(&self, title: &str, message: &str) {
        warn!(title, "{}", message);
    }
}
