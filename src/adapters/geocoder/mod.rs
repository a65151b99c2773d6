pub mod adresse;
pub mod nominatim;

pub use adresse::AdresseGeocoder;
pub use nominatim::NominatimGeocoder;

use crate::adapters::http::build_client;
use crate::core::{ConfigProvider, GeocodingService};
use crate::domain::model::GeocoderBackend;
use crate::utils::error::Result;

/// Builds the geocoder the configuration selects.
pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Box<dyn GeocodingService>> {
    let client = build_client(config.geocoder_timeout(), config.user_agent())?;
    let endpoint = config.geocoder_endpoint().to_string();
    tracing::debug!(
        "Using {:?} geocoder at {}",
        config.geocoder_backend(),
        endpoint
    );

    let geocoder: Box<dyn GeocodingService> = match config.geocoder_backend() {
        GeocoderBackend::Nominatim => Box::new(NominatimGeocoder::new(client, endpoint)),
        GeocoderBackend::Adresse => Box::new(AdresseGeocoder::new(client, endpoint)),
    };
    Ok(geocoder)
}
