//! services/app/src/adapters/storage.rs
//!
//! A small JSON-file key-value store standing in for the device's persisted
//! storage. The push-notification token lives under `push_token`.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pawtrack_core::ports::{PortError, PortResult, PushTokenStore};
use tokio::sync::Mutex;
use tracing::debug;

pub const PUSH_TOKEN_KEY: &str = "push_token";

/// A flat `{ "key": "value" }` JSON document on disk.
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> PortResult<BTreeMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) if raw.is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => serde_json::from_slice(&raw).map_err(|e| {
                PortError::Unexpected(format!("Corrupt store {}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }

    pub async fn get(&self, key: &str) -> PortResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    pub async fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }
        let raw = serde_json::to_vec_pretty(&entries)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        debug!(key, path = %self.path.display(), "Stored value");
        Ok(())
    }
}

#[async_trait]
impl PushTokenStore for JsonFileStore {
    async fn push_token(&self) -> PortResult<Option<String>> {
        Ok(self.get(PUSH_TOKEN_KEY).await?.filter(|t| !t.is_empty()))
    }

    async fn save_push_token(&self, token: &str) -> PortResult<()> {
        self.set(PUSH_TOKEN_KEY, token).await
    }
}
