//! crates/pawtrack_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary between the view-models and everything they
//! talk to: the reports backend, the auth provider, and the device itself.
//! Concrete implementations live in the `app` service; tests substitute fakes.

use async_trait::async_trait;
use crate::domain::{
    AuthSession, Coordinates, CreatedReport, CreatedSighting, LostReport, MatchResult, Placemark,
    ReportFormData, SightingFormData, User,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
///
/// The `Display` output of each variant is the message shown to the user, so
/// the formats here are part of the client's contract.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortError {
    /// No session (or no user) at the time an authenticated call was attempted.
    #[error("ERR_AUTH_MISSING: {0}")]
    AuthMissing(String),
    /// The backend answered with something other than the expected status, or
    /// never answered at all (`status == 0`).
    #[error("[HTTP {status}] {message}")]
    Http { status: u16, message: String },
    /// A list fetch failed; the underlying cause has already been logged.
    #[error("{0}")]
    Unavailable(String),
    /// The backend sent a value this client does not recognize.
    #[error("Unexpected backend payload: {0}")]
    Decode(String),
    /// The user refused a device permission.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Backend Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait FeedService: Send + Sync {
    /// Active lost reports, newest first as ordered by the backend.
    async fn get_lost_reports(&self) -> PortResult<Vec<LostReport>>;

    /// Street sightings, adapted to the same card shape as lost reports.
    async fn get_sightings(&self) -> PortResult<Vec<LostReport>>;
}

#[async_trait]
pub trait MatchService: Send + Sync {
    /// Pending matches for the signed-in user.
    async fn get_my_matches(&self) -> PortResult<Vec<MatchResult>>;
}

#[async_trait]
pub trait ReportService: Send + Sync {
    /// Uploads the photo at `image_uri` together with the form.
    async fn create_report(&self, image_uri: &str, form: &ReportFormData)
        -> PortResult<CreatedReport>;
}

#[async_trait]
pub trait SightingService: Send + Sync {
    async fn create_sighting(
        &self,
        image_uri: &str,
        form: &SightingFormData,
    ) -> PortResult<CreatedSighting>;
}

//=========================================================================================
// Auth and Storage Ports
//=========================================================================================

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current_session(&self) -> PortResult<Option<AuthSession>>;

    async fn current_user(&self) -> PortResult<Option<User>>;
}

/// Local persisted storage for the push-notification token.
#[async_trait]
pub trait PushTokenStore: Send + Sync {
    async fn push_token(&self) -> PortResult<Option<String>>;

    async fn save_push_token(&self, token: &str) -> PortResult<()>;
}

//=========================================================================================
// Device Ports
//=========================================================================================

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Asks for foreground location access. `false` means the user refused.
    async fn request_foreground_permission(&self) -> PortResult<bool>;

    /// Reads the current position at the highest available accuracy.
    async fn current_position(&self) -> PortResult<Coordinates>;
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Candidate addresses for a position, best first. May be empty.
    async fn reverse_geocode(&self, position: Coordinates) -> PortResult<Vec<Placemark>>;
}

#[async_trait]
pub trait ImagePicker: Send + Sync {
    async fn request_library_permission(&self) -> PortResult<bool>;

    /// Returns the local URI of the chosen image, or `None` if the user cancelled.
    async fn pick_image(&self) -> PortResult<Option<String>>;
}

/// Blocking, user-facing notices.
pub trait Notifier: Send + Sync {
    fn alert(&self, title: &str, message: &str);
}
