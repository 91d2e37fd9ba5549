//! Location seam. Device geolocation lives outside this crate; callers plug
//! in a `LocationProvider`, or use `FixedLocation` with configured coordinates.

use async_trait::async_trait;

use crate::types::{Location, LocationError};

/// Source of the device location
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(&self) -> Result<Location, LocationError>;
}

/// A location known up front, or a permanently refused one.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(Option<Location>);

impl FixedLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self(Some(Location {
            latitude,
            longitude,
        }))
    }

    /// Behaves like a device whose user declined the location prompt.
    pub fn denied() -> Self {
        Self(None)
    }

    /// Location from configured coordinates, or denied when they are missing
    pub fn from_config(config: &moodmeal_core::WeatherConfig) -> Self {
        match config.coordinates() {
            Some((lat, lon)) => Self::new(lat, lon),
            None => Self::denied(),
        }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Location, LocationError> {
        self.0.ok_or(LocationError::PermissionDenied)
    }
}
