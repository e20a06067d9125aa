//! Device geolocation capability
//!
//! A host may not offer geolocation at all, the user may refuse it, or it may
//! never answer. The enrichment provider treats all three as degradations.

use async_trait::async_trait;
use shared::Coordinates;
use thiserror::Error;

use crate::config::GeolocationConfig;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocationError {
    #[error("Geolocation is not available on this host")]
    Unavailable,

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Timed out waiting for a position")]
    Timeout,
}

/// Source of the device position
#[async_trait]
pub trait Geolocator: Send + Sync {
    /// Whether the host offers geolocation at all
    fn is_supported(&self) -> bool {
        true
    }

    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// A position known up front, e.g. from configuration or the command line
pub struct FixedPosition {
    coordinates: Coordinates,
}

impl FixedPosition {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl Geolocator for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.coordinates)
    }
}

/// A host without geolocation
pub struct NoGeolocation;

#[async_trait]
impl Geolocator for NoGeolocation {
    fn is_supported(&self) -> bool {
        false
    }

    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Err(GeolocationError::Unavailable)
    }
}

/// Geolocation as configured: a fixed position, or none
pub fn from_config(config: &GeolocationConfig) -> Box<dyn Geolocator> {
    match config.coordinates() {
        Some(coordinates) => Box::new(FixedPosition::new(coordinates)),
        None => Box::new(NoGeolocation),
    }
}
