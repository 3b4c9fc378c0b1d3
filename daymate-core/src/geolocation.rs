use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::{config::Config, error::GeolocationError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Device position capability.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Geolocation backed by a fixed, configured device position.
///
/// Without a configured position the capability is reported as unsupported.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredGeolocator {
    position: Option<Coordinates>,
}

impl ConfiguredGeolocator {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.device_coordinates())
    }
}

#[async_trait]
impl Geolocator for ConfiguredGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        let position = self.position.ok_or(GeolocationError::Unsupported)?;

        if !position.is_valid() {
            return Err(GeolocationError::Unavailable(format!(
                "configured position {},{} is out of range",
                position.latitude, position.longitude
            )));
        }

        Ok(position)
    }
}
