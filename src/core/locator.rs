use crate::core::ConfigProvider;
use crate::domain::model::{LocationFix, UpdateRequest};
use crate::domain::ports::LocationProvider;
use crate::utils::error::{LocatorError, Result};
use chrono::Utc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    /// Cached fixes at or beyond this age trigger a live request.
    pub max_fix_age: Duration,
    pub update_request: UpdateRequest,
    pub acquisition_timeout: Duration,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            max_fix_age: Duration::from_secs(30),
            update_request: UpdateRequest::default(),
            acquisition_timeout: Duration::from_secs(10),
        }
    }
}

impl FreshnessPolicy {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            max_fix_age: config.max_fix_age(),
            update_request: config.update_request(),
            acquisition_timeout: config.acquisition_timeout(),
        }
    }
}

/// Prefers a recent cached fix, otherwise waits for the first live one.
pub struct Locator<L: LocationProvider> {
    provider: L,
    policy: FreshnessPolicy,
}

impl<L: LocationProvider> Locator<L> {
    pub fn new(provider: L, policy: FreshnessPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn policy(&self) -> &FreshnessPolicy {
        &self.policy
    }

    pub async fn acquire(&self) -> Result<LocationFix> {
        match self.provider.last_known_location().await {
            Ok(Some(fix)) => {
                let age = fix.age_at(Utc::now());
                if age < self.policy.max_fix_age {
                    tracing::info!(
                        "Using last known location: lat={}, lon={}, age={}s",
                        fix.coordinate.latitude,
                        fix.coordinate.longitude,
                        age.as_secs()
                    );
                    return Ok(fix);
                }
                tracing::debug!("Last known location is {}s old, requesting current location", age.as_secs());
            }
            Ok(None) => {
                tracing::debug!("No last known location, requesting current location");
            }
            Err(LocatorError::PermissionDenied) => return Err(LocatorError::PermissionDenied),
            Err(e) => {
                tracing::warn!("Failed to get last known location: {}, requesting current", e);
            }
        }

        self.request_current_location().await
    }

    async fn request_current_location(&self) -> Result<LocationFix> {
        let mut updates = self.provider.subscribe(&self.policy.update_request).await?;
        tracing::debug!("Requesting current location updates...");

        let first = tokio::time::timeout(self.policy.acquisition_timeout, updates.next()).await;
        updates.cancel();

        match first {
            Ok(Some(fix)) => {
                tracing::info!(
                    "Fresh location: lat={}, lon={}",
                    fix.coordinate.latitude,
                    fix.coordinate.longitude
                );
                Ok(fix)
            }
            Ok(None) => Err(LocatorError::LocationUnavailable {
                message: "location updates ended before a fix arrived".to_string(),
            }),
            Err(_) => Err(LocatorError::AcquisitionTimeout {
                seconds: self.policy.acquisition_timeout.as_secs(),
            }),
        }
    }
}
