use crate::core::district::DistrictResolver;
use crate::core::locator::Locator;
use crate::core::state::{LookupEvent, LookupState, LookupStatus};
use crate::domain::model::Coordinate;
use crate::domain::ports::{GeocodingService, LocationProvider};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;

/// Runs location → reverse geocode → district lookups and publishes each
/// state change. Starting a lookup cancels the one in flight, and events
/// from a superseded lookup are discarded.
pub struct LookupEngine<L: LocationProvider, G: GeocodingService> {
    locator: Locator<L>,
    geocoder: G,
    resolver: DistrictResolver,
    state: watch::Sender<LookupState>,
    generation: AtomicU64,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl<L: LocationProvider, G: GeocodingService> LookupEngine<L, G> {
    pub fn new(locator: Locator<L>, geocoder: G, resolver: DistrictResolver) -> Self {
        let (state, _) = watch::channel(LookupState::default());
        Self {
            locator,
            geocoder,
            resolver,
            state,
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LookupState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> LookupState {
        self.state.borrow().clone()
    }

    /// Acquires a location and resolves it.
    pub async fn refresh(&self) -> LookupState {
        let (generation, token) = self.begin().await;

        let acquired = tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!("Lookup {} superseded during location acquisition", generation);
                return self.snapshot();
            }
            acquired = self.locator.acquire() => acquired,
        };

        match acquired {
            Ok(fix) => self.resolve(generation, &token, fix.coordinate).await,
            Err(e) => {
                tracing::warn!("Location acquisition failed: {}", e);
                self.dispatch(generation, LookupEvent::LocationFailed(LookupStatus::from(&e)));
            }
        }

        self.snapshot()
    }

    /// Resolves a coordinate obtained elsewhere, skipping acquisition.
    pub async fn locate(&self, coordinate: Coordinate) -> LookupState {
        let (generation, token) = self.begin().await;
        self.resolve(generation, &token, coordinate).await;
        self.snapshot()
    }

    /// Cancels the lookup in flight and publishes `Started` for a new one.
    async fn begin(&self) -> (u64, CancellationToken) {
        let mut in_flight = self.in_flight.lock().await;
        if let Some(previous) = in_flight.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        *in_flight = Some(token.clone());

        // The generation only moves while the watch value is locked, so
        // `dispatch` never sees it change between its check and its write.
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = std::mem::take(state).apply(LookupEvent::Started);
        });
        (generation, token)
    }

    async fn resolve(&self, generation: u64, token: &CancellationToken, coordinate: Coordinate) {
        self.dispatch(generation, LookupEvent::LocationAcquired(coordinate));

        let geocoded = tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!("Lookup {} superseded during geocoding", generation);
                return;
            }
            geocoded = self.geocoder.reverse_geocode(coordinate) => geocoded,
        };

        let address = match geocoded {
            Ok(address) => address,
            Err(e) => {
                tracing::warn!("Reverse geocoding via {} failed: {}", self.geocoder.name(), e);
                None
            }
        };

        let postal_code = address.and_then(|a| a.postal_code);
        let district = self.resolver.resolve(postal_code.as_deref());
        tracing::info!(
            "Postal code: {:?}, arrondissement: {:?}",
            postal_code,
            district
        );

        self.dispatch(
            generation,
            LookupEvent::AddressResolved {
                postal_code,
                district,
            },
        );
    }

    fn dispatch(&self, generation: u64, event: LookupEvent) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = std::mem::take(state).apply(event);
            true
        });
        if !applied {
            tracing::debug!("Dropping stale event from lookup {}", generation);
        }
        applied
    }
}
