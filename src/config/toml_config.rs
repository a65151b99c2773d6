use crate::adapters::http::DEFAULT_USER_AGENT;
use crate::core::district::RangePolicy;
use crate::core::{ConfigProvider, Coordinate, UpdateRequest};
use crate::domain::model::{GeocoderBackend, LocationSource};
use crate::utils::error::{LocatorError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub district: DistrictConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Fixed,
    Track,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub source: SourceKind,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub track_file: Option<String>,
    pub max_fix_age_seconds: Option<u64>,
    pub update_interval_ms: Option<u64>,
    pub min_update_interval_ms: Option<u64>,
    pub max_update_delay_ms: Option<u64>,
    pub high_accuracy: Option<bool>,
    pub acquisition_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default)]
    pub backend: GeocoderBackend,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistrictConfig {
    #[serde(default)]
    pub range_policy: RangePolicy,
}

pub const DEFAULT_MAX_FIX_AGE_SECONDS: u64 = 30;
pub const DEFAULT_ACQUISITION_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_GEOCODER_TIMEOUT_SECONDS: u64 = 10;

impl TomlConfig {
    /// Loads a configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LocatorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration text, substituting `${VAR}` references first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LocatorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LocatorError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        match self.location.source {
            SourceKind::Fixed => {
                let latitude = validate_required_field("location.latitude", &self.location.latitude)?;
                let longitude =
                    validate_required_field("location.longitude", &self.location.longitude)?;
                validate_range("location.latitude", *latitude, -90.0, 90.0)?;
                validate_range("location.longitude", *longitude, -180.0, 180.0)?;
            }
            SourceKind::Track => {
                let track = validate_required_field("location.track_file", &self.location.track_file)?;
                validate_path("location.track_file", track)?;
            }
        }

        validate_positive_number(
            "location.max_fix_age_seconds",
            self.location
                .max_fix_age_seconds
                .unwrap_or(DEFAULT_MAX_FIX_AGE_SECONDS),
            1,
        )?;
        validate_positive_number(
            "location.acquisition_timeout_seconds",
            self.location
                .acquisition_timeout_seconds
                .unwrap_or(DEFAULT_ACQUISITION_TIMEOUT_SECONDS),
            1,
        )?;
        if let Some(interval) = self.location.update_interval_ms {
            validate_positive_number("location.update_interval_ms", interval, 1)?;
        }

        validate_url("geocoder.endpoint", self.geocoder_endpoint())?;
        validate_positive_number(
            "geocoder.timeout_seconds",
            self.geocoder
                .timeout_seconds
                .unwrap_or(DEFAULT_GEOCODER_TIMEOUT_SECONDS),
            1,
        )?;
        validate_non_empty_string("geocoder.user_agent", self.user_agent())?;

        Ok(())
    }

    pub fn range_policy(&self) -> RangePolicy {
        self.district.range_policy
    }
}

impl ConfigProvider for TomlConfig {
    fn location_source(&self) -> Result<LocationSource> {
        match self.location.source {
            SourceKind::Fixed => {
                let latitude = validate_required_field("location.latitude", &self.location.latitude)?;
                let longitude =
                    validate_required_field("location.longitude", &self.location.longitude)?;
                Ok(LocationSource::Fixed(Coordinate::new(*latitude, *longitude)))
            }
            SourceKind::Track => {
                let track = validate_required_field("location.track_file", &self.location.track_file)?;
                Ok(LocationSource::Track(PathBuf::from(track)))
            }
        }
    }

    fn geocoder_backend(&self) -> GeocoderBackend {
        self.geocoder.backend
    }

    fn geocoder_endpoint(&self) -> &str {
        self.geocoder
            .endpoint
            .as_deref()
            .unwrap_or(self.geocoder.backend.default_endpoint())
    }

    fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(
            self.geocoder
                .timeout_seconds
                .unwrap_or(DEFAULT_GEOCODER_TIMEOUT_SECONDS),
        )
    }

    fn user_agent(&self) -> &str {
        self.geocoder
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    fn max_fix_age(&self) -> Duration {
        Duration::from_secs(
            self.location
                .max_fix_age_seconds
                .unwrap_or(DEFAULT_MAX_FIX_AGE_SECONDS),
        )
    }

    fn update_request(&self) -> UpdateRequest {
        let defaults = UpdateRequest::default();
        UpdateRequest {
            interval: self
                .location
                .update_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.interval),
            min_update_interval: self
                .location
                .min_update_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.min_update_interval),
            max_update_delay: self
                .location
                .max_update_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.max_update_delay),
            high_accuracy: self
                .location
                .high_accuracy
                .unwrap_or(defaults.high_accuracy),
        }
    }

    fn acquisition_timeout(&self) -> Duration {
        Duration::from_secs(
            self.location
                .acquisition_timeout_seconds
                .unwrap_or(DEFAULT_ACQUISITION_TIMEOUT_SECONDS),
        )
    }

    fn strict_district_range(&self) -> bool {
        self.district.range_policy == RangePolicy::Strict
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
