//! services/app/src/viewmodels/report.rs
//!
//! The lost-report form: holds what the user has entered, validates it, and
//! publishes it through the `ReportService` port.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pawtrack_core::domain::{LocationState, ReportFormData, ReportType};
use pawtrack_core::location::LocationResolver;
use pawtrack_core::ports::{ImagePicker, Notifier, ReportService};
use tokio::sync::watch;
use tracing::{info, warn};

use super::form::{FormMedia, FormStatus, StatusCell};
use super::state::AppState;

const LOCATION_PROMPT: &str = "Select location";
const MISSING_FIELDS: &str = "Missing required fields (photo, species, location, contact).";

/// A single editable field of the report form.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportField {
    PetName(String),
    Species(String),
    Breed(String),
    Description(String),
    ContactInfo(String),
    LostDate(DateTime<Utc>),
    LastSeenLocation(String),
}

pub struct ReportViewModel {
    reports: Arc<dyn ReportService>,
    location: LocationResolver,
    images: Arc<dyn ImagePicker>,
    notifier: Arc<dyn Notifier>,
    form: ReportFormData,
    media: FormMedia,
    status: StatusCell,
}

impl ReportViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            reports: state.reports.clone(),
            location: state.location.clone(),
            images: state.images.clone(),
            notifier: state.notifier.clone(),
            form: ReportFormData::default(),
            media: FormMedia::new(LOCATION_PROMPT),
            status: StatusCell::new(),
        }
    }

    pub fn form(&self) -> &ReportFormData {
        &self.form
    }

    pub fn image_uri(&self) -> Option<&str> {
        self.media.image_uri.as_deref()
    }

    pub fn location_state(&self) -> &LocationState {
        &self.media.location
    }

    pub fn is_loading_location(&self) -> bool {
        self.media.is_loading_location
    }

    pub fn status(&self) -> FormStatus {
        self.status.get()
    }

    pub fn is_submitting(&self) -> bool {
        self.status() == FormStatus::Submitting
    }

    pub fn error(&self) -> Option<String> {
        self.status().error().map(str::to_string)
    }

    /// Lets a view re-render on every status change.
    pub fn subscribe(&self) -> watch::Receiver<FormStatus> {
        self.status.subscribe()
    }

    pub fn set_report_type(&mut self, report_type: ReportType) {
        self.form.report_type = report_type;
    }

    pub fn set_field(&mut self, field: ReportField) {
        match field {
            ReportField::PetName(v) => self.form.pet_name = v,
            ReportField::Species(v) => self.form.species = v,
            ReportField::Breed(v) => self.form.breed = v,
            ReportField::Description(v) => self.form.description = v,
            ReportField::ContactInfo(v) => self.form.contact_info = v,
            ReportField::LostDate(v) => self.form.lost_date = v,
            ReportField::LastSeenLocation(v) => self.form.last_seen_location_text = v,
        }
    }

    pub async fn pick_image(&mut self) {
        self.media
            .pick_image(self.images.as_ref(), self.notifier.as_ref())
            .await;
    }

    /// Fills the last-seen location from the device.
    pub async fn select_location(&mut self) {
        if let Some(geo) = self
            .media
            .select_location(&self.location, self.notifier.as_ref())
            .await
        {
            self.form.last_seen_location_text = geo.address;
        }
    }

    fn validate(&self) -> Result<&str, &'static str> {
        let image_uri = self.media.image_uri.as_deref().ok_or(MISSING_FIELDS)?;
        let required = [
            &self.form.last_seen_location_text,
            &self.form.species,
            &self.form.contact_info,
        ];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(MISSING_FIELDS);
        }
        Ok(image_uri)
    }

    /// Publishes the report. Returns the new report id on success so the
    /// caller can show the matches for it.
    ///
    /// On failure the message is kept in the status, the user is alerted, and
    /// the form is left as it was.
    pub async fn submit(&mut self) -> Option<String> {
        let image_uri = match self.validate() {
            Ok(uri) => uri.to_string(),
            Err(message) => {
                self.status.set(FormStatus::Error(message.to_string()));
                return None;
            }
        };

        self.status.set(FormStatus::Submitting);

        match self.reports.create_report(&image_uri, &self.form).await {
            Ok(created) => {
                info!(report_id = %created.report_id, "Lost report published");
                self.form = ReportFormData::default();
                self.media.reset();
                self.status.set(FormStatus::Idle);
                Some(created.report_id)
            }
            Err(e) => {
                let message = e.to_string();
                warn!("Publishing the report failed: {}", message);
                self.notifier.alert("Publishing error", &message);
                self.status.set(FormStatus::Error(message));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewmodels::testing::Harness;
    use pawtrack_core::domain::CreatedReport;
    use pawtrack_core::ports::PortError;

    fn filled(vm: &mut ReportViewModel) {
        vm.set_field(ReportField::PetName("Firulais".into()));
        vm.set_field(ReportField::Species("dog".into()));
        vm.set_field(ReportField::ContactInfo("+51 999 888 777".into()));
        vm.set_field(ReportField::LastSeenLocation("Cayma".into()));
    }

    #[tokio::test]
    async fn missing_fields_never_reach_the_network() {
        let harness = Harness::new();
        let mut vm = ReportViewModel::new(&harness.state);
        vm.set_field(ReportField::Species("dog".into()));

        assert_eq!(vm.submit().await, None);
        assert_eq!(vm.error().as_deref(), Some(MISSING_FIELDS));
        assert_eq!(harness.backend.report_calls(), 0);

        vm.pick_image().await;
        assert_eq!(vm.submit().await, None);
        assert_eq!(harness.backend.report_calls(), 0);
    }

    #[tokio::test]
    async fn success_returns_id_and_resets_the_form() {
        let harness = Harness::new();
        harness.backend.set_report_result(Ok(CreatedReport {
            report_id: "r1".into(),
        }));
        let mut vm = ReportViewModel::new(&harness.state);
        vm.set_report_type(ReportType::Found);
        filled(&mut vm);
        vm.pick_image().await;
        vm.select_location().await;
        assert_eq!(vm.form().last_seen_location_text, "-16.409, -71.5375");

        assert_eq!(vm.submit().await.as_deref(), Some("r1"));

        let defaults = ReportFormData::default();
        let form = vm.form();
        assert_eq!(form.report_type, defaults.report_type);
        assert_eq!(form.pet_name, "");
        assert_eq!(form.species, "");
        assert_eq!(form.contact_info, "");
        assert_eq!(form.last_seen_location_text, "");
        assert_eq!(vm.image_uri(), None);
        assert_eq!(vm.location_state(), &LocationState::unresolved(LOCATION_PROMPT));
        assert_eq!(vm.status(), FormStatus::Idle);
    }

    #[tokio::test]
    async fn status_is_submitting_while_the_request_runs() {
        let harness = Harness::new();
        let mut vm = ReportViewModel::new(&harness.state);
        harness.backend.watch_report_status(vm.subscribe());
        filled(&mut vm);
        vm.pick_image().await;

        vm.submit().await;

        assert_eq!(harness.backend.status_seen(), Some(FormStatus::Submitting));
    }

    #[tokio::test]
    async fn failure_keeps_input_and_alerts() {
        let harness = Harness::new();
        harness.backend.set_report_result(Err(PortError::Http {
            status: 422,
            message: "Invalid species".into(),
        }));
        let mut vm = ReportViewModel::new(&harness.state);
        filled(&mut vm);
        vm.pick_image().await;
        let before = vm.form().clone();

        assert_eq!(vm.submit().await, None);

        assert_eq!(vm.error().as_deref(), Some("[HTTP 422] Invalid species"));
        assert_eq!(vm.form(), &before);
        assert!(vm.image_uri().is_some());
        assert_eq!(harness.alerts(), vec!["Publishing error".to_string()]);
    }

    #[tokio::test]
    async fn denied_photo_permission_changes_nothing() {
        let harness = Harness::new();
        harness.backend.deny_photos();
        let mut vm = ReportViewModel::new(&harness.state);

        vm.pick_image().await;

        assert_eq!(vm.image_uri(), None);
        assert_eq!(harness.alerts(), vec!["Permission required".to_string()]);
    }

    #[tokio::test]
    async fn picking_again_replaces_the_photo() {
        let harness = Harness::new();
        let mut vm = ReportViewModel::new(&harness.state);

        vm.pick_image().await;
        harness.backend.set_next_photo("/tmp/second.png");
        vm.pick_image().await;

        assert_eq!(vm.image_uri(), Some("/tmp/second.png"));
    }
}
