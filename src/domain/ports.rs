use crate::domain::model::{Address, Coordinate, GeocoderBackend, LocationFix, LocationSource, UpdateRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Source of device positions.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// The most recent cached fix, if the provider has one. May be stale.
    async fn last_known_location(&self) -> Result<Option<LocationFix>>;

    /// Starts live updates. The producer stops once the handle is cancelled or dropped.
    async fn subscribe(&self, request: &UpdateRequest) -> Result<LocationUpdates>;
}

/// Reverse geocoding: coordinates in, structured address out.
#[async_trait]
pub trait GeocodingService: Send + Sync {
    fn name(&self) -> &str;

    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Option<Address>>;
}

pub trait ConfigProvider: Send + Sync {
    fn location_source(&self) -> Result<LocationSource>;
    fn geocoder_backend(&self) -> GeocoderBackend;
    fn geocoder_endpoint(&self) -> &str;
    fn geocoder_timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
    fn max_fix_age(&self) -> Duration;
    fn update_request(&self) -> UpdateRequest;
    fn acquisition_timeout(&self) -> Duration;
    fn strict_district_range(&self) -> bool;
}

/// Cancelable stream of live fixes handed out by [`LocationProvider::subscribe`].
#[derive(Debug)]
pub struct LocationUpdates {
    receiver: mpsc::Receiver<LocationFix>,
    cancel: CancellationToken,
}

impl LocationUpdates {
    pub fn new(receiver: mpsc::Receiver<LocationFix>, cancel: CancellationToken) -> Self {
        Self { receiver, cancel }
    }

    /// Creates a connected sender/handle pair. Producers should stop once
    /// `token.is_cancelled()` or the send fails.
    pub fn channel(buffer: usize) -> (mpsc::Sender<LocationFix>, CancellationToken, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        let cancel = CancellationToken::new();
        (tx, cancel.clone(), Self::new(rx, cancel))
    }

    pub async fn next(&mut self) -> Option<LocationFix> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            _ = self.cancel.cancelled() => None,
            fix = self.receiver.recv() => fix,
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for LocationUpdates {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[async_trait]
impl<T: LocationProvider + ?Sized> LocationProvider for Box<T> {
    async fn last_known_location(&self) -> Result<Option<LocationFix>> {
        (**self).last_known_location().await
    }

    async fn subscribe(&self, request: &UpdateRequest) -> Result<LocationUpdates> {
        (**self).subscribe(request).await
    }
}

#[async_trait]
impl<T: GeocodingService + ?Sized> GeocodingService for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<Option<Address>> {
        (**self).reverse_geocode(coordinate).await
    }
}
