//! crates/pawtrack_core/src/location.rs
//!
//! Turns the device's position into a `GeoLocation` with a readable address.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{Coordinates, GeoLocation, Placemark};
use crate::ports::{LocationProvider, Notifier, PortError, PortResult, ReverseGeocoder};

/// Combines the position and reverse-geocoding ports into a single lookup.
#[derive(Clone)]
pub struct LocationResolver {
    provider: Arc<dyn LocationProvider>,
    geocoder: Arc<dyn ReverseGeocoder>,
    notifier: Arc<dyn Notifier>,
}

impl LocationResolver {
    pub fn new(
        provider: Arc<dyn LocationProvider>,
        geocoder: Arc<dyn ReverseGeocoder>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            provider,
            geocoder,
            notifier,
        }
    }

    /// Resolves the current location.
    ///
    /// Returns `Ok(None)` after telling the user when location access is refused.
    /// Failing to read the position is an error; failing to geocode it is not,
    /// the address then falls back to the raw coordinates.
    pub async fn get_current_location(&self) -> PortResult<Option<GeoLocation>> {
        if !self.provider.request_foreground_permission().await? {
            self.notifier.alert(
                "Permission denied",
                "We need access to your location to report the pet.",
            );
            return Ok(None);
        }

        let position = self.provider.current_position().await.map_err(|e| {
            warn!("Could not read device position: {}", e);
            PortError::Unexpected("We could not get your current location.".to_string())
        })?;

        let address = self.address_for(position).await;
        debug!(address = %address, "Resolved device location");

        Ok(Some(GeoLocation {
            latitude: position.latitude,
            longitude: position.longitude,
            address,
        }))
    }

    async fn address_for(&self, position: Coordinates) -> String {
        match self.geocoder.reverse_geocode(position).await {
            Ok(candidates) => candidates
                .first()
                .and_then(format_address)
                .unwrap_or_else(|| coordinates_text(position)),
            Err(e) => {
                warn!("Reverse geocoding failed: {}", e);
                coordinates_text(position)
            }
        }
    }
}

/// `street, number, city, region`, skipping parts that are missing or blank.
pub fn format_address(place: &Placemark) -> Option<String> {
    let parts: Vec<&str> = [
        &place.street,
        &place.street_number,
        &place.city,
        &place.region,
    ]
    .into_iter()
    .filter_map(|p| p.as_deref())
    .map(str::trim)
    .filter(|p| !p.is_empty())
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// `"<lat>, <lon>"` with the shortest float representation.
pub fn coordinates_text(position: Coordinates) -> String {
    format!("{}, {}", position.latitude, position.longitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeDevice {
        granted: bool,
        position: PortResult<Coordinates>,
    }

    #[async_trait]
    impl LocationProvider for FakeDevice {
        async fn request_foreground_permission(&self) -> PortResult<bool> {
            Ok(self.granted)
        }

        async fn current_position(&self) -> PortResult<Coordinates> {
            self.position.clone()
        }
    }

    struct FakeGeocoder(PortResult<Vec<Placemark>>);

    #[async_trait]
    impl ReverseGeocoder for FakeGeocoder {
        async fn reverse_geocode(&self, _position: Coordinates) -> PortResult<Vec<Placemark>> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct RecordingNotifier(Mutex<Vec<String>>);

    impl Notifier for RecordingNotifier {
        fn alert(&self, title: &str, _message: &str) {
            self.0.lock().unwrap().push(title.to_string());
        }
    }

    const AREQUIPA: Coordinates = Coordinates {
        latitude: -16.4090,
        longitude: -71.5375,
    };

    fn resolver(
        granted: bool,
        position: PortResult<Coordinates>,
        geocoded: PortResult<Vec<Placemark>>,
    ) -> (LocationResolver, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let resolver = LocationResolver::new(
            Arc::new(FakeDevice { granted, position }),
            Arc::new(FakeGeocoder(geocoded)),
            notifier.clone(),
        );
        (resolver, notifier)
    }

    #[tokio::test]
    async fn builds_address_from_first_candidate() {
        let place = Placemark {
            street: Some("Av. Ejercito".into()),
            street_number: None,
            city: Some("Arequipa".into()),
            region: Some("Arequipa".into()),
        };
        let (resolver, _) = resolver(true, Ok(AREQUIPA), Ok(vec![place]));

        let location = resolver.get_current_location().await.unwrap().unwrap();
        assert_eq!(location.address, "Av. Ejercito, Arequipa, Arequipa");
        assert_eq!(location.latitude, -16.409);
    }

    #[tokio::test]
    async fn falls_back_to_coordinates_without_candidates() {
        let (resolver, _) = resolver(true, Ok(AREQUIPA), Ok(vec![]));

        let location = resolver.get_current_location().await.unwrap().unwrap();
        assert_eq!(location.address, "-16.409, -71.5375");
    }

    #[tokio::test]
    async fn geocoder_failure_is_not_fatal() {
        let (resolver, _) = resolver(
            true,
            Ok(AREQUIPA),
            Err(PortError::Unexpected("geocoder offline".into())),
        );

        let location = resolver.get_current_location().await.unwrap().unwrap();
        assert_eq!(location.address, "-16.409, -71.5375");
    }

    #[tokio::test]
    async fn position_failure_propagates() {
        let (resolver, _) = resolver(
            true,
            Err(PortError::Unexpected("gps off".into())),
            Ok(vec![]),
        );

        assert!(resolver.get_current_location().await.is_err());
    }

    #[tokio::test]
    async fn denied_permission_alerts_and_returns_none() {
        let (resolver, notifier) = resolver(false, Ok(AREQUIPA), Ok(vec![]));

        assert_eq!(resolver.get_current_location().await.unwrap(), None);
        assert_eq!(notifier.0.lock().unwrap().as_slice(), ["Permission denied"]);
    }

    #[test]
    fn candidate_with_only_blank_parts_has_no_address() {
        let place = Placemark {
            street: Some("  ".into()),
            ..Placemark::default()
        };
        assert_eq!(format_address(&place), None);
    }
}
