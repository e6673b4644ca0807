pub mod domain;
pub mod location;
pub mod ports;

pub use domain::{
    AuthSession, Coordinates, CreatedReport, CreatedSighting, GeoLocation, LocationState,
    LostReport, MatchResult, MatchStatus, Placemark, ReportFormData, ReportStatus, ReportType,
    SightingFormData, SightingStatus, Species, User,
};
pub use location::LocationResolver;
pub use ports::{
    AuthProvider, FeedService, ImagePicker, LocationProvider, MatchService, Notifier, PortError,
    PortResult, PushTokenStore, ReportService, ReverseGeocoder, SightingService,
};
