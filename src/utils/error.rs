use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable: {message}")]
    LocationUnavailable { message: String },

    #[error("No location fix within {seconds}s")]
    AcquisitionTimeout { seconds: u64 },

    #[error("Invalid coordinate: lat={latitude}, lon={longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Geocoding provider '{provider}' is rate limiting requests")]
    RateLimited { provider: String },

    #[error("Geocoding error: {message}")]
    GeocodingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Location,
    Geocoding,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LocatorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) => ErrorCategory::Network,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::PermissionDenied
            | Self::LocationUnavailable { .. }
            | Self::AcquisitionTimeout { .. } => ErrorCategory::Location,
            Self::InvalidCoordinate { .. }
            | Self::RateLimited { .. }
            | Self::GeocodingError { .. } => ErrorCategory::Geocoding,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidCoordinate { .. } | Self::GeocodingError { .. } => ErrorSeverity::Low,
            Self::HttpError(_)
            | Self::RateLimited { .. }
            | Self::LocationUnavailable { .. }
            | Self::AcquisitionTimeout { .. } => ErrorSeverity::Medium,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::PermissionDenied => ErrorSeverity::High,
            Self::IoError(_) | Self::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::HttpError(_) => "Check network connectivity and the geocoder endpoint".to_string(),
            Self::IoError(_) => "Check that the file exists and is readable".to_string(),
            Self::SerializationError(_) => "Check the JSON file format".to_string(),
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Review the configuration file".to_string()
            }
            Self::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}'", field)
            }
            Self::MissingConfigError { field } => format!("Provide a value for '{}'", field),
            Self::PermissionDenied => "Grant location access and retry".to_string(),
            Self::LocationUnavailable { .. } | Self::AcquisitionTimeout { .. } => {
                "Move to an area with better reception and refresh".to_string()
            }
            Self::InvalidCoordinate { .. } => {
                "Latitude must be within [-90, 90] and longitude within [-180, 180]".to_string()
            }
            Self::RateLimited { .. } => "Wait a moment before retrying".to_string(),
            Self::GeocodingError { .. } => "Retry later or switch geocoder".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the geocoding service: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Location => format!("Could not determine your location: {}", self),
            ErrorCategory::Geocoding => format!("Could not resolve an address: {}", self),
            ErrorCategory::System => format!("Unexpected system error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, LocatorError>;
