use super::toml_config::{
    SourceKind, TomlConfig, DEFAULT_ACQUISITION_TIMEOUT_SECONDS,
    DEFAULT_GEOCODER_TIMEOUT_SECONDS, DEFAULT_MAX_FIX_AGE_SECONDS,
};
use crate::adapters::http::DEFAULT_USER_AGENT;
use crate::core::district::RangePolicy;
use crate::core::{ConfigProvider, Coordinate, UpdateRequest};
use crate::domain::model::{GeocoderBackend, LocationSource};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_range, validate_required_field,
    validate_url, Validate,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "arrondissement")]
#[command(about = "Find which Paris arrondissement a location falls in")]
pub struct CliConfig {
    /// TOML configuration file; flags given here override it
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// JSON track file replayed as live location updates
    #[arg(long, conflicts_with_all = ["latitude", "longitude"])]
    pub track: Option<String>,

    #[arg(long, value_enum)]
    pub geocoder: Option<GeocoderBackend>,

    /// Geocoder base URL (defaults to the public instance of the chosen backend)
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub user_agent: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Cached fixes older than this are ignored
    #[arg(long)]
    pub max_fix_age_seconds: Option<u64>,

    #[arg(long)]
    pub acquisition_timeout_seconds: Option<u64>,

    /// Reject district numbers outside 1-20
    #[arg(long)]
    pub strict_range: bool,

    /// Resolve this postal code directly, without locating
    #[arg(long)]
    pub postal_code: Option<String>,

    /// Print the final lookup state as JSON
    #[arg(long)]
    pub json: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn range_policy(&self) -> RangePolicy {
        if self.strict_range {
            RangePolicy::Strict
        } else {
            RangePolicy::Lenient
        }
    }

    /// Layers the flags that were given on top of a file configuration.
    pub fn apply_to(&self, config: &mut TomlConfig) {
        if let Some(track) = &self.track {
            config.location.source = SourceKind::Track;
            config.location.track_file = Some(track.clone());
            tracing::info!("🔧 Track file overridden to: {}", track);
        }
        if self.latitude.is_some() || self.longitude.is_some() {
            config.location.source = SourceKind::Fixed;
            config.location.latitude = self.latitude.or(config.location.latitude);
            config.location.longitude = self.longitude.or(config.location.longitude);
            tracing::info!("🔧 Fixed location overridden from command line");
        }
        if let Some(backend) = self.geocoder {
            if backend != config.geocoder.backend && self.endpoint.is_none() {
                config.geocoder.endpoint = None;
            }
            config.geocoder.backend = backend;
        }
        if let Some(endpoint) = &self.endpoint {
            config.geocoder.endpoint = Some(endpoint.clone());
        }
        if let Some(user_agent) = &self.user_agent {
            config.geocoder.user_agent = Some(user_agent.clone());
        }
        if let Some(timeout) = self.timeout_seconds {
            config.geocoder.timeout_seconds = Some(timeout);
        }
        if let Some(age) = self.max_fix_age_seconds {
            config.location.max_fix_age_seconds = Some(age);
        }
        if let Some(timeout) = self.acquisition_timeout_seconds {
            config.location.acquisition_timeout_seconds = Some(timeout);
        }
        if self.strict_range {
            config.district.range_policy = RangePolicy::Strict;
        }
    }
}

impl ConfigProvider for CliConfig {
    fn location_source(&self) -> Result<LocationSource> {
        if let Some(track) = &self.track {
            return Ok(LocationSource::Track(PathBuf::from(track)));
        }
        let latitude = validate_required_field("latitude", &self.latitude)?;
        let longitude = validate_required_field("longitude", &self.longitude)?;
        Ok(LocationSource::Fixed(Coordinate::new(*latitude, *longitude)))
    }

    fn geocoder_backend(&self) -> GeocoderBackend {
        self.geocoder.unwrap_or_default()
    }

    fn geocoder_endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or(self.geocoder_backend().default_endpoint())
    }

    fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(
            self.timeout_seconds
                .unwrap_or(DEFAULT_GEOCODER_TIMEOUT_SECONDS),
        )
    }

    fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    fn max_fix_age(&self) -> Duration {
        Duration::from_secs(
            self.max_fix_age_seconds
                .unwrap_or(DEFAULT_MAX_FIX_AGE_SECONDS),
        )
    }

    fn update_request(&self) -> UpdateRequest {
        UpdateRequest::default()
    }

    fn acquisition_timeout(&self) -> Duration {
        Duration::from_secs(
            self.acquisition_timeout_seconds
                .unwrap_or(DEFAULT_ACQUISITION_TIMEOUT_SECONDS),
        )
    }

    fn strict_district_range(&self) -> bool {
        self.strict_range
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        match self.location_source()? {
            LocationSource::Fixed(coordinate) => {
                validate_range("latitude", coordinate.latitude, -90.0, 90.0)?;
                validate_range("longitude", coordinate.longitude, -180.0, 180.0)?;
            }
            LocationSource::Track(path) => {
                validate_path("track", &path.to_string_lossy())?;
            }
        }
        validate_url("endpoint", self.geocoder_endpoint())?;
        validate_positive_number("timeout_seconds", self.geocoder_timeout().as_secs(), 1)?;
        validate_positive_number("max_fix_age_seconds", self.max_fix_age().as_secs(), 1)?;
        validate_positive_number(
            "acquisition_timeout_seconds",
            self.acquisition_timeout().as_secs(),
            1,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::LocatorError;

    #[test]
    fn test_parses_negative_coordinates() {
        let config = CliConfig::try_parse_from([
            "arrondissement",
            "--latitude",
            "-33.86",
            "--longitude",
            "151.21",
        ])
        .unwrap();

        assert_eq!(
            config.location_source().unwrap(),
            LocationSource::Fixed(Coordinate::new(-33.86, 151.21))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_track_conflicts_with_coordinates() {
        let result = CliConfig::try_parse_from([
            "arrondissement",
            "--track",
            "walk.json",
            "--latitude",
            "48.85",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_longitude_fails_validation() {
        let config =
            CliConfig::try_parse_from(["arrondissement", "--latitude", "48.85"]).unwrap();
        assert!(matches!(
            config.validate(),
            Err(LocatorError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_backend_selects_default_endpoint() {
        let config = CliConfig::try_parse_from([
            "arrondissement",
            "--latitude",
            "48.85",
            "--longitude",
            "2.35",
            "--geocoder",
            "adresse",
            "--strict-range",
        ])
        .unwrap();

        assert_eq!(config.geocoder_endpoint(), "https://api-adresse.data.gouv.fr");
        assert_eq!(config.range_policy(), RangePolicy::Strict);
    }

    #[test]
    fn test_flags_override_file_configuration() {
        let mut file = TomlConfig::from_toml_str(
            r#"
[location]
latitude = 45.76
longitude = 4.84

[geocoder]
backend = "nominatim"
endpoint = "https://nominatim.example.org"
"#,
        )
        .unwrap();
        let cli = CliConfig::try_parse_from([
            "arrondissement",
            "--latitude",
            "48.85",
            "--geocoder",
            "adresse",
            "--max-fix-age-seconds",
            "5",
        ])
        .unwrap();

        cli.apply_to(&mut file);

        assert_eq!(
            file.location_source().unwrap(),
            LocationSource::Fixed(Coordinate::new(48.85, 4.84))
        );
        assert_eq!(file.geocoder_backend(), GeocoderBackend::Adresse);
        assert_eq!(file.geocoder_endpoint(), "https://api-adresse.data.gouv.fr");
        assert_eq!(file.max_fix_age(), Duration::from_secs(5));
    }
}
