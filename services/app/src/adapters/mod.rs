pub mod auth;
pub mod device;
pub mod feed;
pub mod geocoder;
pub mod http;
pub mod matches;
pub mod report;
pub mod sighting;
pub mod storage;
pub mod upload;

pub use auth::StaticAuthProvider;
pub use device::{ConfiguredPosition, PathImagePicker, TracingNotifier};
pub use feed::HttpFeedAdapter;
pub use geocoder::NominatimGeocoder;
pub use http::ApiClient;
pub use matches::HttpMatchAdapter;
pub use report::HttpReportAdapter;
pub use sighting::HttpSightingAdapter;
pub use storage::JsonFileStore;
pub use upload::SubmissionClient;
