//! services/app/src/adapters/geocoder.rs
//!
//! Implements the `ReverseGeocoder` port against a Nominatim-compatible
//! `/reverse` endpoint.

use async_trait::async_trait;
use pawtrack_core::domain::{Coordinates, Placemark};
use pawtrack_core::ports::{PortError, PortResult, ReverseGeocoder};
use reqwest::Client;
use serde::Deserialize;

#[derive(Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ReverseResponse {
    address: Option<AddressRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct AddressRecord {
    road: Option<String>,
    house_number: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
}

impl AddressRecord {
    fn to_domain(self) -> Placemark {
        Placemark {
            street: self.road,
            street_number: self.house_number,
            city: self.city.or(self.town).or(self.village),
            region: self.state,
        }
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse_geocode(&self, position: Coordinates) -> PortResult<Vec<Placemark>> {
        let response = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", position.latitude.to_string()),
                ("lon", position.longitude.to_string()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Nominatim answers `{"error": "Unable to geocode"}` when nothing is there.
        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(body
            .address
            .map(AddressRecord::to_domain)
            .into_iter()
            .collect())
    }
}
