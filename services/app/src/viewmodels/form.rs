//! services/app/src/viewmodels/form.rs
//!
//! State shared by the report and sighting forms: the submission status and
//! the photo/location sub-flows.

use pawtrack_core::domain::{GeoLocation, LocationState};
use pawtrack_core::location::LocationResolver;
use pawtrack_core::ports::{ImagePicker, Notifier};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Where a form is in its submit cycle.
///
/// `Error` behaves like `Idle` (the form can be submitted again) but keeps
/// the message for display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Error(String),
}

impl FormStatus {
    pub fn error(&self) -> Option<&str> {
        match self {
            FormStatus::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Publishes `FormStatus` changes to any subscribed view.
pub struct StatusCell {
    tx: watch::Sender<FormStatus>,
}

impl StatusCell {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(FormStatus::Idle);
        Self { tx }
    }

    pub fn get(&self) -> FormStatus {
        self.tx.borrow().clone()
    }

    pub fn set(&self, status: FormStatus) {
        self.tx.send_replace(status);
    }

    pub fn subscribe(&self) -> watch::Receiver<FormStatus> {
        self.tx.subscribe()
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

/// The photo and location a form is holding. Each pick replaces the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct FormMedia {
    pub image_uri: Option<String>,
    pub location: LocationState,
    pub is_loading_location: bool,
    prompt: &'static str,
}

impl FormMedia {
    pub fn new(prompt: &'static str) -> Self {
        Self {
            image_uri: None,
            location: LocationState::unresolved(prompt),
            is_loading_location: false,
            prompt,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.prompt);
    }

    /// Asks for library access, then lets the user choose a photo.
    /// A refusal is reported to the user and leaves the current photo alone.
    pub async fn pick_image(&mut self, picker: &dyn ImagePicker, notifier: &dyn Notifier) {
        match picker.request_library_permission().await {
            Ok(true) => {}
            Ok(false) => {
                notifier.alert(
                    "Permission required",
                    "Access to the photo library is needed to attach a photo.",
                );
                return;
            }
            Err(e) => {
                notifier.alert("Error", &e.to_string());
                return;
            }
        }

        match picker.pick_image().await {
            Ok(Some(uri)) => {
                debug!(uri = %uri, "Photo selected");
                self.image_uri = Some(uri);
            }
            Ok(None) => debug!("Photo selection cancelled"),
            Err(e) => {
                warn!("Photo selection failed: {}", e);
                notifier.alert("Error", &e.to_string());
            }
        }
    }

    /// Resolves the device location. Returns the new location so the caller
    /// can copy its address into the form's location text.
    pub async fn select_location(
        &mut self,
        resolver: &LocationResolver,
        notifier: &dyn Notifier,
    ) -> Option<GeoLocation> {
        self.is_loading_location = true;
        let result = resolver.get_current_location().await;
        self.is_loading_location = false;

        match result {
            Ok(Some(geo)) => {
                self.location = LocationState::from(&geo);
                Some(geo)
            }
            Ok(None) => None,
            Err(e) => {
                notifier.alert("Error", &e.to_string());
                None
            }
        }
    }
}
