//! services/app/src/viewmodels/sighting.rs
//!
//! The sighting form, used by someone who found or saw a loose animal.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pawtrack_core::domain::{CreatedSighting, LocationState, SightingFormData, SightingStatus};
use pawtrack_core::location::LocationResolver;
use pawtrack_core::ports::{ImagePicker, Notifier, SightingService};
use tokio::sync::watch;
use tracing::{info, warn};

use super::form::{FormMedia, FormStatus, StatusCell};
use super::state::AppState;

const LOCATION_PROMPT: &str = "Tap to get location";
const PHOTO_REQUIRED: &str = "A photo is required for a sighting.";
const LOCATION_REQUIRED: &str = "The location is required.";

#[derive(Debug, Clone, PartialEq)]
pub enum SightingField {
    Description(String),
    SightingDate(DateTime<Utc>),
    LocationText(String),
    Status(SightingStatus),
}

pub struct SightingViewModel {
    sightings: Arc<dyn SightingService>,
    location: LocationResolver,
    images: Arc<dyn ImagePicker>,
    notifier: Arc<dyn Notifier>,
    form: SightingFormData,
    media: FormMedia,
    status: StatusCell,
}

impl SightingViewModel {
    pub fn new(state: &AppState) -> Self {
        Self {
            sightings: state.sightings.clone(),
            location: state.location.clone(),
            images: state.images.clone(),
            notifier: state.notifier.clone(),
            form: SightingFormData::default(),
            media: FormMedia::new(LOCATION_PROMPT),
            status: StatusCell::new(),
        }
    }

    pub fn form(&self) -> &SightingFormData {
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

    pub fn error(&self) -> Option<String> {
        self.status().error().map(str::to_string)
    }

    pub fn subscribe(&self) -> watch::Receiver<FormStatus> {
        self.status.subscribe()
    }

    pub fn set_field(&mut self, field: SightingField) {
        match field {
            SightingField::Description(v) => self.form.description = v,
            SightingField::SightingDate(v) => self.form.sighting_date = v,
            SightingField::LocationText(v) => self.form.location_text = v,
            SightingField::Status(v) => self.form.status = v,
        }
    }

    pub async fn pick_image(&mut self) {
        self.media
            .pick_image(self.images.as_ref(), self.notifier.as_ref())
            .await;
    }

    pub async fn select_location(&mut self) {
        if let Some(geo) = self
            .media
            .select_location(&self.location, self.notifier.as_ref())
            .await
        {
            self.form.location_text = geo.address;
        }
    }

    /// Publishes the sighting, thanking the user on success.
    pub async fn submit(&mut self) -> Option<CreatedSighting> {
        let Some(image_uri) = self.media.image_uri.clone() else {
            self.status.set(FormStatus::Error(PHOTO_REQUIRED.to_string()));
            return None;
        };
        if self.form.location_text.trim().is_empty() {
            self.status.set(FormStatus::Error(LOCATION_REQUIRED.to_string()));
            return None;
        }

        self.status.set(FormStatus::Submitting);

        match self.sightings.create_sighting(&image_uri, &self.form).await {
            Ok(created) => {
                info!(
                    sighting_id = %created.sighting_id,
                    matches_found = ?created.matches_found,
                    "Sighting published"
                );
                self.notifier.alert(
                    "Sighting reported!",
                    "Thanks for your help. We have notified the owners of similar pets.",
                );
                self.form = SightingFormData::default();
                self.media.reset();
                self.status.set(FormStatus::Idle);
                Some(created)
            }
            Err(e) => {
                let message = e.to_string();
                warn!("Publishing the sighting failed: {}", message);
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
    use pawtrack_core::ports::PortError;

    #[tokio::test]
    async fn photo_is_checked_before_location() {
        let harness = Harness::new();
        let mut vm = SightingViewModel::new(&harness.state);

        assert!(vm.submit().await.is_none());
        assert_eq!(vm.error().as_deref(), Some(PHOTO_REQUIRED));

        vm.pick_image().await;
        assert!(vm.submit().await.is_none());
        assert_eq!(vm.error().as_deref(), Some(LOCATION_REQUIRED));
        assert_eq!(harness.backend.sighting_calls(), 0);
    }

    #[tokio::test]
    async fn success_thanks_the_user_and_resets() {
        let harness = Harness::new();
        let mut vm = SightingViewModel::new(&harness.state);
        vm.pick_image().await;
        vm.select_location().await;
        vm.set_field(SightingField::Status(SightingStatus::InShelter));
        vm.set_field(SightingField::Description("Collar rojo".into()));

        let created = vm.submit().await.unwrap();

        assert_eq!(created.sighting_id, "s-default");
        let sent = harness.backend.last_sighting_form().unwrap();
        assert_eq!(sent.location_text, "-16.409, -71.5375");
        assert_eq!(sent.status, SightingStatus::InShelter);
        assert_eq!(vm.form().location_text, "");
        assert_eq!(vm.form().status, SightingStatus::OnStreet);
        assert_eq!(vm.image_uri(), None);
        assert_eq!(harness.alerts(), vec!["Sighting reported!".to_string()]);
    }

    #[tokio::test]
    async fn failure_keeps_the_form() {
        let harness = Harness::new();
        harness
            .backend
            .set_sighting_result(Err(PortError::AuthMissing("sign in".into())));
        let mut vm = SightingViewModel::new(&harness.state);
        vm.pick_image().await;
        vm.set_field(SightingField::LocationText("Yanahuara".into()));

        assert!(vm.submit().await.is_none());

        assert_eq!(vm.error().as_deref(), Some("ERR_AUTH_MISSING: sign in"));
        assert_eq!(vm.form().location_text, "Yanahuara");
        assert!(vm.image_uri().is_some());
    }

    #[tokio::test]
    async fn refused_location_leaves_state_alone() {
        let harness = Harness::new();
        harness.backend.deny_location();
        let mut vm = SightingViewModel::new(&harness.state);

        vm.select_location().await;

        assert_eq!(vm.location_state(), &LocationState::unresolved(LOCATION_PROMPT));
        assert_eq!(vm.form().location_text, "");
        assert!(!vm.is_loading_location());
        assert_eq!(harness.alerts(), vec!["Permission denied".to_string()]);
    }
}
