use crate::domain::model::Coordinate;
use crate::utils::error::LocatorError;
use serde::Serialize;
use std::fmt;

/// Why a lookup ended without a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    PermissionDenied,
    LocationUnavailable,
}

impl From<&LocatorError> for LookupStatus {
    fn from(err: &LocatorError) -> Self {
        match err {
            LocatorError::PermissionDenied => Self::PermissionDenied,
            _ => Self::LocationUnavailable,
        }
    }
}

impl fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "Permission Denied"),
            Self::LocationUnavailable => write!(f, "Location Unavailable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupEvent {
    Started,
    LocationAcquired(Coordinate),
    LocationFailed(LookupStatus),
    AddressResolved {
        postal_code: Option<String>,
        district: Option<u8>,
    },
}

/// Snapshot of what a lookup has produced so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LookupState {
    pub coordinate: Option<Coordinate>,
    pub postal_code: Option<String>,
    pub district: Option<u8>,
    pub is_loading: bool,
    pub status: Option<LookupStatus>,
}

impl LookupState {
    pub fn apply(self, event: LookupEvent) -> Self {
        match event {
            LookupEvent::Started => Self {
                is_loading: true,
                ..Self::default()
            },
            LookupEvent::LocationAcquired(coordinate) => Self {
                coordinate: Some(coordinate),
                postal_code: None,
                district: None,
                status: None,
                ..self
            },
            LookupEvent::LocationFailed(status) => Self {
                status: Some(status),
                ..Self::default()
            },
            LookupEvent::AddressResolved {
                postal_code,
                district,
            } => Self {
                postal_code,
                district,
                is_loading: false,
                ..self
            },
        }
    }

    pub fn is_settled(&self) -> bool {
        !self.is_loading
    }
}

impl fmt::Display for LookupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_loading {
            return write!(f, "Locating...");
        }
        if let Some(district) = self.district {
            return write!(f, "Arrondissement {}", district);
        }

        write!(f, "Not in Paris?")?;
        if let Some(coordinate) = self.coordinate {
            write!(
                f,
                "\nLat: {}, Lon: {}",
                coordinate.latitude, coordinate.longitude
            )?;
        }
        if let Some(postal_code) = &self.postal_code {
            write!(f, "\nPostal Code: {}", postal_code)?;
        }
        if let Some(status) = self.status {
            write!(f, "\nStatus: {}", status)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> Coordinate {
        Coordinate::new(48.8566, 2.3522)
    }

    #[test]
    fn test_started_clears_previous_result() {
        let previous = LookupState {
            coordinate: Some(paris()),
            postal_code: Some("75004".to_string()),
            district: Some(4),
            is_loading: false,
            status: None,
        };

        let state = previous.apply(LookupEvent::Started);

        assert!(state.is_loading);
        assert_eq!(state.coordinate, None);
        assert_eq!(state.postal_code, None);
        assert_eq!(state.district, None);
    }

    #[test]
    fn test_full_successful_sequence() {
        let state = LookupState::default()
            .apply(LookupEvent::Started)
            .apply(LookupEvent::LocationAcquired(paris()));
        assert!(state.is_loading);
        assert_eq!(state.coordinate, Some(paris()));

        let state = state.apply(LookupEvent::AddressResolved {
            postal_code: Some("75004".to_string()),
            district: Some(4),
        });
        assert!(state.is_settled());
        assert_eq!(state.coordinate, Some(paris()));
        assert_eq!(state.postal_code.as_deref(), Some("75004"));
        assert_eq!(state.district, Some(4));
        assert_eq!(state.to_string(), "Arrondissement 4");
    }

    #[test]
    fn test_location_failure_records_status() {
        let state = LookupState::default()
            .apply(LookupEvent::Started)
            .apply(LookupEvent::LocationFailed(LookupStatus::PermissionDenied));

        assert!(!state.is_loading);
        assert_eq!(state.postal_code, None);
        assert_eq!(state.status, Some(LookupStatus::PermissionDenied));
        assert_eq!(state.to_string(), "Not in Paris?\nStatus: Permission Denied");
    }

    #[test]
    fn test_missing_address_renders_coordinates() {
        let state = LookupState::default()
            .apply(LookupEvent::Started)
            .apply(LookupEvent::LocationAcquired(Coordinate::new(45.75, 4.85)))
            .apply(LookupEvent::AddressResolved {
                postal_code: Some("69002".to_string()),
                district: None,
            });

        assert_eq!(
            state.to_string(),
            "Not in Paris?\nLat: 45.75, Lon: 4.85\nPostal Code: 69002"
        );
    }

    #[test]
    fn test_status_from_error() {
        assert_eq!(
            LookupStatus::from(&LocatorError::PermissionDenied),
            LookupStatus::PermissionDenied
        );
        assert_eq!(
            LookupStatus::from(&LocatorError::AcquisitionTimeout { seconds: 10 }),
            LookupStatus::LocationUnavailable
        );
    }
}
