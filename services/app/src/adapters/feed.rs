//! services/app/src/adapters/feed.rs
//!
//! This module contains the feed adapter, the concrete implementation of the
//! `FeedService` port. It fetches active lost reports and street sightings and
//! reshapes them into feed cards.

use async_trait::async_trait;
use pawtrack_core::domain::{
    image_or_placeholder, text_or, LostReport, ReportStatus, SightingStatus, Species,
    REPORT_PLACEHOLDER_IMAGE, SIGHTED_PET_NAME, UNKNOWN_LOCATION, UNSPECIFIED_BREED,
};
use pawtrack_core::ports::{FeedService, PortError, PortResult};
use serde::Deserialize;
use tracing::{error, info};

use super::http::ApiClient;

const FEED_LIMIT: u32 = 20;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `FeedService` port over the reports backend.
#[derive(Clone)]
pub struct HttpFeedAdapter {
    api: ApiClient,
}

impl HttpFeedAdapter {
    /// Creates a new `HttpFeedAdapter`.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

//=========================================================================================
// Backend Record Structs
//=========================================================================================

/// Lifecycle of a lost report as the backend spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum BackendReportStatus {
    Activa,
    Encontrada,
}

#[derive(Debug, Deserialize)]
pub struct LostReportRecord {
    report_id: String,
    owner_user_id: String,
    #[serde(default)]
    pet_name: String,
    species: Option<String>,
    breed: Option<String>,
    image_url: Option<String>,
    status: BackendReportStatus,
    last_seen_location_text: Option<String>,
    lost_date: String,
    description: Option<String>,
}

impl LostReportRecord {
    pub fn to_domain(self) -> LostReport {
        LostReport {
            id: self.report_id,
            user_id: self.owner_user_id,
            name: self.pet_name,
            species: Species::classify(self.species.as_deref().unwrap_or_default()),
            breed: text_or(self.breed.as_deref(), UNSPECIFIED_BREED),
            image_url: image_or_placeholder(self.image_url.as_deref(), REPORT_PLACEHOLDER_IMAGE),
            location: text_or(self.last_seen_location_text.as_deref(), UNKNOWN_LOCATION),
            created_at: self.lost_date,
            status: match self.status {
                BackendReportStatus::Activa => ReportStatus::Lost,
                BackendReportStatus::Encontrada => ReportStatus::Found,
            },
            description: self.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SightingRecord {
    sighting_id: String,
    reporter_user_id: String,
    image_url: Option<String>,
    location_text: Option<String>,
    sighting_date: String,
    description: Option<String>,
    // Decoded only so an unknown status fails loudly.
    #[serde(default)]
    #[allow(dead_code)]
    status: Option<SightingStatus>,
}

impl SightingRecord {
    /// Sightings carry no name, species or breed, so the card uses generic values.
    pub fn to_domain(self) -> LostReport {
        LostReport {
            id: self.sighting_id,
            user_id: self.reporter_user_id,
            name: SIGHTED_PET_NAME.to_string(),
            species: Species::Other,
            breed: UNSPECIFIED_BREED.to_string(),
            image_url: image_or_placeholder(self.image_url.as_deref(), REPORT_PLACEHOLDER_IMAGE),
            location: text_or(self.location_text.as_deref(), UNKNOWN_LOCATION),
            created_at: self.sighting_date,
            status: ReportStatus::Found,
            description: self.description,
        }
    }
}

/// Transport problems collapse into one user-facing message; a payload this
/// client cannot decode is reported as such.
fn list_failure(e: reqwest::Error, message: &str) -> PortError {
    if e.is_decode() {
        error!("Backend payload did not match the expected schema: {}", e);
        PortError::Decode(e.to_string())
    } else {
        error!("{} Cause: {}", message, e);
        PortError::Unavailable(message.to_string())
    }
}

//=========================================================================================
// `FeedService` Trait Implementation
//=========================================================================================

#[async_trait]
impl FeedService for HttpFeedAdapter {
    async fn get_lost_reports(&self) -> PortResult<Vec<LostReport>> {
        let query = [
            ("status", "Activa".to_string()),
            ("limit", FEED_LIMIT.to_string()),
        ];
        let envelope = self
            .api
            .get_envelope::<Vec<LostReportRecord>>("/lost-reports", &query, None)
            .await
            .map_err(|e| list_failure(e, "Could not load reports."))?;

        let records = envelope.into_data().unwrap_or_default();
        info!("Loaded {} lost reports", records.len());
        Ok(records.into_iter().map(LostReportRecord::to_domain).collect())
    }

    async fn get_sightings(&self) -> PortResult<Vec<LostReport>> {
        let query = [
            ("status", SightingStatus::OnStreet.as_str().to_string()),
            ("limit", FEED_LIMIT.to_string()),
        ];
        let envelope = self
            .api
            .get_envelope::<Vec<SightingRecord>>("/sighting-reports", &query, None)
            .await
            .map_err(|e| list_failure(e, "Could not load sightings."))?;

        let records = envelope.into_data().unwrap_or_default();
        info!("Loaded {} sightings", records.len());
        Ok(records.into_iter().map(SightingRecord::to_domain).collect())
    }
}
