pub mod district;
pub mod locator;
pub mod lookup;
pub mod state;

pub use crate::domain::model::{Address, Coordinate, LocationFix, UpdateRequest};
pub use crate::domain::ports::{ConfigProvider, GeocodingService, LocationProvider, LocationUpdates};
pub use crate::utils::error::Result;
