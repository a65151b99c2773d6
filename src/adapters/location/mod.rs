pub mod fixed;
pub mod track;

pub use fixed::FixedLocationProvider;
pub use track::{Track, TrackLocationProvider};

use crate::core::{ConfigProvider, LocationProvider};
use crate::domain::model::LocationSource;
use crate::utils::error::Result;

/// Builds the location provider the configuration selects.
pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Box<dyn LocationProvider>> {
    let provider: Box<dyn LocationProvider> = match config.location_source()? {
        LocationSource::Fixed(coordinate) => {
            tracing::debug!(
                "Using fixed location lat={}, lon={}",
                coordinate.latitude,
                coordinate.longitude
            );
            Box::new(FixedLocationProvider::new(coordinate))
        }
        LocationSource::Track(path) => Box::new(TrackLocationProvider::from_file(path)?),
    };
    Ok(provider)
}
