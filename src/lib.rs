pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::engine_from_config;
pub use config::toml_config::TomlConfig;
pub use crate::core::district::{resolve_district, DistrictResolver, RangePolicy};
pub use crate::core::lookup::LookupEngine;
pub use crate::core::state::{LookupState, LookupStatus};
pub use domain::model::{Address, Coordinate, LocationFix};
pub use utils::error::{LocatorError, Result};
