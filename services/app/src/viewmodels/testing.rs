//! In-memory fakes for every port, so view-models can be tested without a
//! backend or a device.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pawtrack_core::domain::{
    Coordinates, CreatedReport, CreatedSighting, LostReport, MatchResult, Placemark,
    ReportFormData, ReportStatus, SightingFormData, Species, REPORT_PLACEHOLDER_IMAGE,
};
use pawtrack_core::location::LocationResolver;
use pawtrack_core::ports::{
    FeedService, ImagePicker, LocationProvider, MatchService, Notifier, PortResult,
    PushTokenStore, ReportService, ReverseGeocoder, SightingService,
};
use tokio::sync::watch;

use super::form::FormStatus;
use super::state::AppState;

struct Inner {
    report_result: PortResult<CreatedReport>,
    report_calls: usize,
    sighting_result: PortResult<CreatedSighting>,
    sighting_calls: usize,
    last_sighting_form: Option<SightingFormData>,
    feed: PortResult<Vec<LostReport>>,
    matches: PortResult<Vec<MatchResult>>,
    status_rx: Option<watch::Receiver<FormStatus>>,
    status_seen: Option<FormStatus>,
    photos_denied: bool,
    location_denied: bool,
    next_photo: String,
    push_token: Option<String>,
    alerts: Vec<String>,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            report_result: Ok(CreatedReport {
                report_id: "r-default".into(),
            }),
            report_calls: 0,
            sighting_result: Ok(CreatedSighting {
                sighting_id: "s-default".into(),
                matches_found: Some(0),
            }),
            sighting_calls: 0,
            last_sighting_form: None,
            feed: Ok(Vec::new()),
            matches: Ok(Vec::new()),
            status_rx: None,
            status_seen: None,
            photos_denied: false,
            location_denied: false,
            next_photo: "/tmp/photo.jpg".into(),
            push_token: None,
            alerts: Vec::new(),
        }
    }
}

/// One fake standing in for the backend, the device and the alert surface.
#[derive(Default)]
pub struct FakeBackend {
    inner: Mutex<Inner>,
}

impl FakeBackend {
    fn with<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        f(&mut self.inner.lock().unwrap())
    }

    pub fn set_report_result(&self, result: PortResult<CreatedReport>) {
        self.with(|i| i.report_result = result);
    }

    pub fn set_sighting_result(&self, result: PortResult<CreatedSighting>) {
        self.with(|i| i.sighting_result = result);
    }

    pub fn set_feed(&self, result: PortResult<Vec<LostReport>>) {
        self.with(|i| i.feed = result);
    }

    pub fn set_matches(&self, result: PortResult<Vec<MatchResult>>) {
        self.with(|i| i.matches = result);
    }

    pub fn set_next_photo(&self, uri: &str) {
        self.with(|i| i.next_photo = uri.to_string());
    }

    pub fn deny_photos(&self) {
        self.with(|i| i.photos_denied = true);
    }

    pub fn deny_location(&self) {
        self.with(|i| i.location_denied = true);
    }

    /// Records the form status observed when the next report reaches the backend.
    pub fn watch_report_status(&self, rx: watch::Receiver<FormStatus>) {
        self.with(|i| i.status_rx = Some(rx));
    }

    pub fn status_seen(&self) -> Option<FormStatus> {
        self.with(|i| i.status_seen.clone())
    }

    pub fn report_calls(&self) -> usize {
        self.with(|i| i.report_calls)
    }

    pub fn sighting_calls(&self) -> usize {
        self.with(|i| i.sighting_calls)
    }

    pub fn last_sighting_form(&self) -> Option<SightingFormData> {
        self.with(|i| i.last_sighting_form.clone())
    }
}

#[async_trait]
impl ReportService for FakeBackend {
    async fn create_report(
        &self,
        _image_uri: &str,
        _form: &ReportFormData,
    ) -> PortResult<CreatedReport> {
        self.with(|i| {
            i.report_calls += 1;
            i.status_seen = i.status_rx.as_ref().map(|rx| rx.borrow().clone());
            i.report_result.clone()
        })
    }
}

#[async_trait]
impl SightingService for FakeBackend {
    async fn create_sighting(
        &self,
        _image_uri: &str,
        form: &SightingFormData,
    ) -> PortResult<CreatedSighting> {
        self.with(|i| {
            i.sighting_calls += 1;
            i.last_sighting_form = Some(form.clone());
            i.sighting_result.clone()
        })
    }
}

#[async_trait]
impl FeedService for FakeBackend {
    async fn get_lost_reports(&self) -> PortResult<Vec<LostReport>> {
        self.with(|i| i.feed.clone())
    }

    async fn get_sightings(&self) -> PortResult<Vec<LostReport>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl MatchService for FakeBackend {
    async fn get_my_matches(&self) -> PortResult<Vec<MatchResult>> {
        self.with(|i| i.matches.clone())
    }
}

#[async_trait]
impl PushTokenStore for FakeBackend {
    async fn push_token(&self) -> PortResult<Option<String>> {
        Ok(self.with(|i| i.push_token.clone()))
    }

    async fn save_push_token(&self, token: &str) -> PortResult<()> {
        self.with(|i| i.push_token = Some(token.to_string()));
        Ok(())
    }
}

#[async_trait]
impl ImagePicker for FakeBackend {
    async fn request_library_permission(&self) -> PortResult<bool> {
        Ok(!self.with(|i| i.photos_denied))
    }

    async fn pick_image(&self) -> PortResult<Option<String>> {
        Ok(Some(self.with(|i| i.next_photo.clone())))
    }
}

#[async_trait]
impl LocationProvider for FakeBackend {
    async fn request_foreground_permission(&self) -> PortResult<bool> {
        Ok(!self.with(|i| i.location_denied))
    }

    async fn current_position(&self) -> PortResult<Coordinates> {
        Ok(Coordinates {
            latitude: -16.4090,
            longitude: -71.5375,
        })
    }
}

#[async_trait]
impl ReverseGeocoder for FakeBackend {
    async fn reverse_geocode(&self, _position: Coordinates) -> PortResult<Vec<Placemark>> {
        Ok(Vec::new())
    }
}

impl Notifier for FakeBackend {
    fn alert(&self, title: &str, _message: &str) {
        self.with(|i| i.alerts.push(title.to_string()));
    }
}

pub struct Harness {
    pub backend: Arc<FakeBackend>,
    pub state: AppState,
}

impl Harness {
    pub fn new() -> Self {
        let backend = Arc::new(FakeBackend::default());
        let state = AppState {
            feed: backend.clone(),
            matches: backend.clone(),
            reports: backend.clone(),
            sightings: backend.clone(),
            push_tokens: backend.clone(),
            location: LocationResolver::new(backend.clone(), backend.clone(), backend.clone()),
            images: backend.clone(),
            notifier: backend.clone(),
        };
        Self { backend, state }
    }

    pub fn alerts(&self) -> Vec<String> {
        self.backend.with(|i| i.alerts.clone())
    }
}

pub fn sample_report(id: &str, name: &str, location: &str) -> LostReport {
    LostReport {
        id: id.to_string(),
        name: name.to_string(),
        species: Species::Other,
        breed: "Mestizo".to_string(),
        image_url: REPORT_PLACEHOLDER_IMAGE.to_string(),
        location: location.to_string(),
        created_at: "2024-03-05".to_string(),
        status: ReportStatus::Lost,
        user_id: "u1".to_string(),
        description: None,
    }
}
