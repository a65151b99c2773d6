use crate::core::{Coordinate, LocationFix, LocationProvider, LocationUpdates, UpdateRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Reports a single configured position, e.g. one passed on the command line.
#[derive(Debug, Clone)]
pub struct FixedLocationProvider {
    coordinate: Coordinate,
    cached: bool,
}

impl FixedLocationProvider {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            cached: true,
        }
    }

    /// No cached fix; every acquisition goes through live updates.
    #[cfg(test)]
    pub fn live_only(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            cached: false,
        }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn last_known_location(&self) -> Result<Option<LocationFix>> {
        Ok(self.cached.then(|| LocationFix::now(self.coordinate)))
    }

    async fn subscribe(&self, request: &UpdateRequest) -> Result<LocationUpdates> {
        let (tx, token, updates) = LocationUpdates::channel(1);
        let coordinate = self.coordinate;
        let period = request
            .interval
            .max(request.min_update_interval)
            .max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if tx.send(LocationFix::now(coordinate)).await.is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!("Fixed location updates stopped");
        });

        Ok(updates)
    }
}
