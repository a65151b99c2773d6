use crate::core::{Coordinate, LocationFix, LocationProvider, LocationUpdates, UpdateRequest};
use crate::utils::error::{LocatorError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Recorded positions replayed as if they came from a device.
///
/// ```json
/// {
///   "last_known": { "latitude": 48.85, "longitude": 2.35, "recorded_at": "2024-05-01T10:00:00Z" },
///   "updates": [ { "latitude": 48.86, "longitude": 2.34 } ]
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub last_known: Option<LocationFix>,
    #[serde(default)]
    pub updates: Vec<Coordinate>,
    /// Simulates a device where location access was refused.
    #[serde(default)]
    pub permission_denied: bool,
}

#[derive(Debug, Clone)]
pub struct TrackLocationProvider {
    track: Track,
}

impl TrackLocationProvider {
    pub fn new(track: Track) -> Self {
        Self { track }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let track: Track = serde_json::from_str(&content)?;
        tracing::debug!(
            "Loaded track from {} with {} updates",
            path.as_ref().display(),
            track.updates.len()
        );
        Ok(Self::new(track))
    }
}

#[async_trait]
impl LocationProvider for TrackLocationProvider {
    async fn last_known_location(&self) -> Result<Option<LocationFix>> {
        if self.track.permission_denied {
            return Err(LocatorError::PermissionDenied);
        }
        Ok(self.track.last_known)
    }

    async fn subscribe(&self, request: &UpdateRequest) -> Result<LocationUpdates> {
        if self.track.permission_denied {
            return Err(LocatorError::PermissionDenied);
        }

        let (tx, token, updates) = LocationUpdates::channel(1);
        let points = self.track.updates.clone();
        let period = request.interval.max(request.min_update_interval);

        tokio::spawn(async move {
            for (i, coordinate) in points.into_iter().enumerate() {
                if i > 0 {
                    tokio::select! {
                        _ = token.cancelled() => return,
                        _ = tokio::time::sleep(period) => {}
                    }
                }
                if token.is_cancelled() || tx.send(LocationFix::now(coordinate)).await.is_err() {
                    return;
                }
            }
            // Sender drops here; the consumer sees the end of the track.
        });

        Ok(updates)
    }
}
