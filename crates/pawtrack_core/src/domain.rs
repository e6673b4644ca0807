//! crates/pawtrack_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of the backend wire schema and of any transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shown when a lost report or sighting has no usable image.
pub const REPORT_PLACEHOLDER_IMAGE: &str = "https://placehold.co/400x300/png?text=Sin+Imagen";

/// Shown when a match has no sighting image.
pub const MATCH_PLACEHOLDER_IMAGE: &str = "https://placehold.co/400x300/png?text=Ver+Coincidencia";

pub const UNSPECIFIED_BREED: &str = "Unspecified breed";
pub const UNKNOWN_LOCATION: &str = "Unknown location";
pub const SIGHTED_PET_NAME: &str = "Sighted pet";

//=========================================================================================
// Classification Helpers
//=========================================================================================

/// The three species buckets the feed knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
    Other,
}

impl Species {
    /// Normalizes a free-form backend species string (Spanish or English).
    ///
    /// Dog keywords win over cat keywords, and anything unmatched is `Other`.
    pub fn classify(raw: &str) -> Self {
        let s = raw.to_lowercase();
        if ["perro", "dog", "canino"].iter().any(|k| s.contains(k)) {
            Species::Dog
        } else if ["gato", "cat", "felino"].iter().any(|k| s.contains(k)) {
            Species::Cat
        } else {
            Species::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
            Species::Other => "other",
        }
    }
}

/// Returns `url` when it holds something other than whitespace, else `placeholder`.
pub fn image_or_placeholder(url: Option<&str>, placeholder: &str) -> String {
    match url {
        Some(u) if !u.trim().is_empty() => u.to_string(),
        _ => placeholder.to_string(),
    }
}

/// Returns the value, or `fallback` when it is missing or blank.
pub fn text_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

//=========================================================================================
// Feed and Match View Models
//=========================================================================================

/// Whether a card in the feed is an owner's lost report or a finder's sighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Lost,
    Found,
}

/// A single card in the feed, adapted from the backend payload.
#[derive(Debug, Clone, PartialEq)]
pub struct LostReport {
    pub id: String,
    pub name: String,
    pub species: Species,
    pub breed: String,
    pub image_url: String,
    pub location: String,
    pub created_at: String,
    pub status: ReportStatus,
    pub user_id: String,
    pub description: Option<String>,
}

impl LostReport {
    /// Case-insensitive search over name, location and breed.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q)
            || self.location.to_lowercase().contains(&q)
            || self.breed.to_lowercase().contains(&q)
    }
}

/// Review state of a backend-computed match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Pending,
    Confirmed,
    Rejected,
}

/// A candidate pairing between one of the user's reports and a sighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_id: String,
    pub report_id: String,
    pub sighting_id: String,
    /// Similarity in `[0, 1]`, computed server-side.
    pub ai_distance_score: f64,
    pub status: MatchStatus,
    pub pet_name: String,
    pub species: String,
    pub breed: String,
    pub location_text: String,
    pub sighting_date: String,
    #[serde(default)]
    pub sighting_image_url: Option<String>,
}

//=========================================================================================
// Form Data
//=========================================================================================

/// Whether the owner is reporting a lost pet or one they already found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    Lost,
    Found,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Lost => "lost",
            ReportType::Found => "found",
        }
    }
}

/// The lost-report form as the user fills it in.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFormData {
    pub report_type: ReportType,
    pub pet_name: String,
    pub species: String,
    pub breed: String,
    pub description: String,
    pub contact_info: String,
    pub lost_date: DateTime<Utc>,
    pub last_seen_location_text: String,
}

impl Default for ReportFormData {
    fn default() -> Self {
        Self {
            report_type: ReportType::Lost,
            pet_name: String::new(),
            species: String::new(),
            breed: String::new(),
            description: String::new(),
            contact_info: String::new(),
            lost_date: Utc::now(),
            last_seen_location_text: String::new(),
        }
    }
}

/// Where a sighted animal currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SightingStatus {
    #[default]
    #[serde(rename = "En_Calle")]
    OnStreet,
    #[serde(rename = "En_Albergue")]
    InShelter,
    #[serde(rename = "Reunido")]
    Reunited,
}

impl SightingStatus {
    /// The backend's string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            SightingStatus::OnStreet => "En_Calle",
            SightingStatus::InShelter => "En_Albergue",
            SightingStatus::Reunited => "Reunido",
        }
    }
}

/// The sighting form as the finder fills it in.
#[derive(Debug, Clone, PartialEq)]
pub struct SightingFormData {
    pub description: String,
    pub sighting_date: DateTime<Utc>,
    pub location_text: String,
    pub status: SightingStatus,
}

impl Default for SightingFormData {
    fn default() -> Self {
        Self {
            description: String::new(),
            sighting_date: Utc::now(),
            location_text: String::new(),
            status: SightingStatus::OnStreet,
        }
    }
}

/// Returned by the backend after a lost report is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedReport {
    pub report_id: String,
}

/// Returned by the backend after a sighting is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSighting {
    pub sighting_id: String,
    pub matches_found: Option<u32>,
}

//=========================================================================================
// Location
//=========================================================================================

/// A resolved device position with a human-readable address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

/// Raw device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One reverse-geocoding candidate. Any component may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placemark {
    pub street: Option<String>,
    pub street_number: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
}

/// The location widget's state inside a form.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationState {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: String,
}

impl LocationState {
    /// An unresolved location showing `prompt` in place of an address.
    pub fn unresolved(prompt: &str) -> Self {
        Self {
            latitude: None,
            longitude: None,
            address: prompt.to_string(),
        }
    }
}

impl From<&GeoLocation> for LocationState {
    fn from(geo: &GeoLocation) -> Self {
        Self {
            latitude: Some(geo.latitude),
            longitude: Some(geo.longitude),
            address: geo.address.clone(),
        }
    }
}

//=========================================================================================
// Auth
//=========================================================================================

/// An active session issued by the auth provider.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub access_token: String,
    pub user_id: Uuid,
}

// Represents the signed-in user
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
}
