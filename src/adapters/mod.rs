// Adapters layer: concrete implementations of the domain ports.

pub mod geocoder;
pub mod http;
pub mod location;

use crate::core::district::{DistrictResolver, RangePolicy};
use crate::core::locator::{FreshnessPolicy, Locator};
use crate::core::lookup::LookupEngine;
use crate::core::{ConfigProvider, GeocodingService, LocationProvider};
use crate::utils::error::Result;

pub type ConfiguredEngine = LookupEngine<Box<dyn LocationProvider>, Box<dyn GeocodingService>>;

/// Wires the configured location provider and geocoder into a lookup engine.
pub fn engine_from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<ConfiguredEngine> {
    let provider = location::from_config(config)?;
    let geocoder = geocoder::from_config(config)?;
    let policy = if config.strict_district_range() {
        RangePolicy::Strict
    } else {
        RangePolicy::Lenient
    };

    Ok(LookupEngine::new(
        Locator::new(provider, FreshnessPolicy::from_config(config)),
        geocoder,
        DistrictResolver::new(policy),
    ))
}
