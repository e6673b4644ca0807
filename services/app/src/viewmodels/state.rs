//! services/app/src/viewmodels/state.rs
//!
//! Defines the application's shared state: every port the view-models talk
//! to, constructed once and injected.

use std::path::PathBuf;
use std::sync::Arc;

use pawtrack_core::location::LocationResolver;
use pawtrack_core::ports::{
    FeedService, ImagePicker, MatchService, Notifier, PushTokenStore, ReportService,
    SightingService,
};

use crate::adapters::{
    ApiClient, ConfiguredPosition, HttpFeedAdapter, HttpMatchAdapter, HttpReportAdapter,
    HttpSightingAdapter, JsonFileStore, NominatimGeocoder, PathImagePicker, StaticAuthProvider,
    SubmissionClient, TracingNotifier,
};
use crate::config::Config;
use crate::error::AppError;

//=========================================================================================
// AppState (Shared Across All View-Models)
//=========================================================================================

/// The shared application state, created once at startup and handed to each view-model.
#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<dyn FeedService>,
    pub matches: Arc<dyn MatchService>,
    pub reports: Arc<dyn ReportService>,
    pub sightings: Arc<dyn SightingService>,
    pub push_tokens: Arc<dyn PushTokenStore>,
    pub location: LocationResolver,
    pub images: Arc<dyn ImagePicker>,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Wires the HTTP and headless device adapters from the configuration.
    /// `image` is the photo the image picker will hand out.
    pub fn from_config(config: &Config, image: Option<PathBuf>) -> Result<Self, AppError> {
        let api = ApiClient::new(config.api_base_url.clone())?;
        let auth = Arc::new(StaticAuthProvider::new(config.session.clone()));
        let store = Arc::new(JsonFileStore::new(config.storage_path.clone()));
        let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);

        let submitter = SubmissionClient::new(api.clone(), auth.clone(), store.clone());
        let location = LocationResolver::new(
            Arc::new(ConfiguredPosition::new(config.device_position)),
            Arc::new(NominatimGeocoder::new(
                api.client().clone(),
                config.geocoder_url.clone(),
            )),
            notifier.clone(),
        );

        Ok(Self {
            feed: Arc::new(HttpFeedAdapter::new(api.clone())),
            matches: Arc::new(HttpMatchAdapter::new(api, auth)),
            reports: Arc::new(HttpReportAdapter::new(submitter.clone())),
            sightings: Arc::new(HttpSightingAdapter::new(submitter)),
            push_tokens: store,
            location,
            images: Arc::new(PathImagePicker::new(image)),
            notifier,
        })
    }
}
