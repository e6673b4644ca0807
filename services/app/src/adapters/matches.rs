//! services/app/src/adapters/matches.rs
//!
//! This module contains the match adapter, which implements the `MatchService`
//! port by asking the backend for the signed-in user's pending matches.

use std::sync::Arc;

use async_trait::async_trait;
use pawtrack_core::domain::{image_or_placeholder, MatchResult, MatchStatus, MATCH_PLACEHOLDER_IMAGE};
use pawtrack_core::ports::{AuthProvider, MatchService, PortError, PortResult};
use tracing::{error, info};

use super::http::ApiClient;

const MATCH_LIMIT: u32 = 10;

/// An adapter that implements the `MatchService` port over the reports backend.
#[derive(Clone)]
pub struct HttpMatchAdapter {
    api: ApiClient,
    auth: Arc<dyn AuthProvider>,
}

impl HttpMatchAdapter {
    pub fn new(api: ApiClient, auth: Arc<dyn AuthProvider>) -> Self {
        Self { api, auth }
    }
}

/// Every match card has an image to show.
fn with_image_fallback(mut m: MatchResult) -> MatchResult {
    m.sighting_image_url = Some(image_or_placeholder(
        m.sighting_image_url.as_deref(),
        MATCH_PLACEHOLDER_IMAGE,
    ));
    m
}

#[async_trait]
impl MatchService for HttpMatchAdapter {
    async fn get_my_matches(&self) -> PortResult<Vec<MatchResult>> {
        let user = self
            .auth
            .current_user()
            .await?
            .ok_or_else(|| PortError::AuthMissing("No authenticated user.".to_string()))?;
        let session = self.auth.current_session().await?;

        let path = format!("/matches/user/{}", user.id);
        let query = [
            ("limit", MATCH_LIMIT.to_string()),
            ("status", "Pending".to_string()),
        ];
        info!("Fetching matches from {}", path);

        let envelope = self
            .api
            .get_envelope::<Vec<MatchResult>>(
                &path,
                &query,
                session.as_ref().map(|s| s.access_token.as_str()),
            )
            .await
            .map_err(|e| {
                if e.is_decode() {
                    error!("Match payload did not match the expected schema: {}", e);
                    PortError::Decode(e.to_string())
                } else {
                    error!("Error fetching matches: {}", e);
                    PortError::Unavailable("Could not load matches.".to_string())
                }
            })?;

        let matches: Vec<MatchResult> = envelope
            .into_data()
            .unwrap_or_default()
            .into_iter()
            .map(with_image_fallback)
            .collect();

        let pending = matches.iter().filter(|m| m.status == MatchStatus::Pending).count();
        info!("Loaded {} matches ({} pending)", matches.len(), pending);
        Ok(matches)
    }
}
