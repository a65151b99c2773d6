//! Reverse geocoding against the French national address base
//! (`api-adresse.data.gouv.fr`), which answers with GeoJSON features.

use crate::adapters::http::{check_status, endpoint_url};
use crate::core::{Address, Coordinate, GeocodingService};
use crate::utils::error::{LocatorError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct FeatureCollectionDto {
    #[serde(default)]
    features: Vec<FeatureDto>,
}

#[derive(Debug, Deserialize)]
struct FeatureDto {
    properties: PropertiesDto,
}

#[derive(Debug, Deserialize)]
struct PropertiesDto {
    postcode: Option<String>,
    city: Option<String>,
    label: Option<String>,
}

impl FeatureCollectionDto {
    fn into_address(self) -> Option<Address> {
        let feature = self.features.into_iter().next()?;
        Some(Address {
            postal_code: feature.properties.postcode,
            label: feature.properties.label,
            city: feature.properties.city,
            country_code: Some("fr".to_string()),
        })
    }
}

pub struct AdresseGeocoder {
    client: Client,
    endpoint: String,
}

impl AdresseGeocoder {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl GeocodingService for AdresseGeocoder {
    fn name(&self) -> &str {
        "adresse"
    }

    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Option<Address>> {
        if !coordinate.is_valid() {
            return Err(LocatorError::InvalidCoordinate {
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
            });
        }

        let url = endpoint_url(&self.endpoint, "reverse/");
        tracing::debug!("Reverse geocoding via adresse: {}", url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lon", coordinate.longitude.to_string()),
                ("lat", coordinate.latitude.to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;

        let body: FeatureCollectionDto = check_status(self.name(), response)?.json().await?;
        Ok(body.into_address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::{build_client, DEFAULT_USER_AGENT};
    use httpmock::prelude::*;
    use std::time::Duration;

    fn geocoder(server: &MockServer) -> AdresseGeocoder {
        let client = build_client(Duration::from_secs(5), DEFAULT_USER_AGENT).unwrap();
        AdresseGeocoder::new(client, server.base_url())
    }

    #[tokio::test]
    async fn test_first_feature_supplies_address() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/reverse/")
                .query_param("lat", "48.8638")
                .query_param("lon", "2.2769")
                .query_param("limit", "1");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "type": "FeatureCollection",
                    "features": [{
                        "type": "Feature",
                        "geometry": { "type": "Point", "coordinates": [2.2769, 48.8638] },
                        "properties": {
                            "label": "12 Avenue Victor Hugo 75116 Paris",
                            "postcode": "75116",
                            "city": "Paris"
                        }
                    }]
                }));
        });

        let address = geocoder(&server)
            .reverse_geocode(Coordinate::new(48.8638, 2.2769))
            .await
            .unwrap()
            .unwrap();

        mock.assert();
        assert_eq!(address.postal_code.as_deref(), Some("75116"));
        assert_eq!(address.label.as_deref(), Some("12 Avenue Victor Hugo 75116 Paris"));
        assert_eq!(address.country_code.as_deref(), Some("fr"));
    }

    #[tokio::test]
    async fn test_no_features_is_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/reverse/");
            then.status(200)
                .json_body(serde_json::json!({ "type": "FeatureCollection", "features": [] }));
        });

        let result = geocoder(&server)
            .reverse_geocode(Coordinate::new(51.5, -0.12))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_server_error_maps_to_geocoding_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/reverse/");
            then.status(503);
        });

        let err = geocoder(&server)
            .reverse_geocode(Coordinate::new(48.86, 2.34))
            .await
            .unwrap_err();

        assert!(matches!(err, LocatorError::GeocodingError { .. }));
    }
}
