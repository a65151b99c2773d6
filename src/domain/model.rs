use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// WGS-84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A coordinate together with the moment the device recorded it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub recorded_at: DateTime<Utc>,
}

impl LocationFix {
    pub fn new(coordinate: Coordinate, recorded_at: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            recorded_at,
        }
    }

    pub fn now(coordinate: Coordinate) -> Self {
        Self::new(coordinate, Utc::now())
    }

    /// Fixes stamped in the future count as brand new.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.recorded_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

/// Reverse-geocoded address. Only `postal_code` feeds district resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub postal_code: Option<String>,
    pub label: Option<String>,
    pub city: Option<String>,
    pub country_code: Option<String>,
}

/// Cadence for live location updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateRequest {
    pub interval: Duration,
    pub min_update_interval: Duration,
    pub max_update_delay: Duration,
    pub high_accuracy: bool,
}

impl Default for UpdateRequest {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1000),
            min_update_interval: Duration::from_millis(500),
            max_update_delay: Duration::from_millis(2000),
            high_accuracy: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum GeocoderBackend {
    /// OpenStreetMap Nominatim.
    #[default]
    Nominatim,
    /// French national address base (api-adresse.data.gouv.fr).
    Adresse,
}

impl GeocoderBackend {
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Nominatim => "https://nominatim.openstreetmap.org",
            Self::Adresse => "https://api-adresse.data.gouv.fr",
        }
    }
}

/// Where positions come from.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    Fixed(Coordinate),
    Track(PathBuf),
}
