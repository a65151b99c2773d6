//! OpenStreetMap Nominatim reverse geocoder.
//!
//! See <https://nominatim.org/release-docs/develop/api/Reverse/>. The public
//! instance requires an identifying user agent and allows one request per
//! second.

use crate::adapters::http::{check_status, endpoint_url};
use crate::core::{Address, Coordinate, GeocodingService};
use crate::utils::error::{LocatorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ReverseResponseDto {
    error: Option<String>,
    display_name: Option<String>,
    address: Option<AddressDto>,
}

#[derive(Debug, Deserialize)]
struct AddressDto {
    postcode: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country_code: Option<String>,
}

impl ReverseResponseDto {
    fn into_address(self) -> Option<Address> {
        if let Some(error) = self.error {
            tracing::debug!("Nominatim found nothing: {}", error);
            return None;
        }
        let details = self.address?;
        Some(Address {
            postal_code: details.postcode,
            label: self.display_name,
            city: details.city.or(details.town).or(details.village),
            country_code: details.country_code,
        })
    }
}

pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl GeocodingService for NominatimGeocoder {
    fn name(&self) -> &str {
        "nominatim"
    }

    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Option<Address>> {
        if !coordinate.is_valid() {
            return Err(LocatorError::InvalidCoordinate {
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
            });
        }

        let url = endpoint_url(&self.endpoint, "reverse");
        tracing::debug!("Reverse geocoding via Nominatim: {}", url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("format", "jsonv2".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await?;

        let body: ReverseResponseDto = check_status(self.name(), response)?.json().await?;
        Ok(body.into_address())
    }
}
