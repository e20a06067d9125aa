//! Context enrichment: live weather for the watering form
//!
//! Always yields a usable [`EnrichedContext`]. Each failure along the way
//! degrades to a fallback reading and, where the user should know about it,
//! an advisory.

use std::sync::Arc;
use std::time::Duration;

use shared::{ContextAdvisory, Coordinates, EnrichedContext, WeatherContext};

use crate::external::WeatherClient;
use crate::geolocation::{GeolocationError, Geolocator};

/// Resolves the device position and the current weather there
#[derive(Clone)]
pub struct ContextProvider {
    geolocator: Arc<dyn Geolocator>,
    weather: Option<WeatherClient>,
    position_timeout: Duration,
}

impl ContextProvider {
    /// `weather` is `None` when no provider key is configured
    pub fn new(
        geolocator: Arc<dyn Geolocator>,
        weather: Option<WeatherClient>,
        position_timeout: Duration,
    ) -> Self {
        Self {
            geolocator,
            weather,
            position_timeout,
        }
    }

    pub async fn acquire_weather(&self) -> EnrichedContext {
        if !self.geolocator.is_supported() {
            tracing::warn!("Geolocation not supported, using default weather");
            return EnrichedContext::degraded(
                WeatherContext::default_location(),
                ContextAdvisory::GeolocationUnsupported,
            );
        }

        let coordinates = match self.locate().await {
            Ok(coordinates) => coordinates,
            Err(GeolocationError::Unavailable) => {
                tracing::warn!("Geolocation unavailable, using default weather");
                return EnrichedContext::degraded(
                    WeatherContext::default_location(),
                    ContextAdvisory::GeolocationUnsupported,
                );
            }
            Err(e) => {
                tracing::warn!("Error getting location: {}", e);
                return EnrichedContext::degraded(
                    WeatherContext::default_location(),
                    ContextAdvisory::PermissionDenied,
                );
            }
        };

        let Some(client) = &self.weather else {
            tracing::info!("Weather API key not configured, using default weather");
            return EnrichedContext::live(WeatherContext::your_location());
        };

        match client.get_current_weather(coordinates).await {
            Ok(weather) => {
                tracing::info!(
                    "Weather for {}: {} {}°C",
                    weather.location_label,
                    weather.condition,
                    weather.temperature
                );
                EnrichedContext::live(weather)
            }
            Err(e) => {
                tracing::error!("Error fetching weather: {}", e);
                EnrichedContext::degraded(
                    WeatherContext::your_location(),
                    ContextAdvisory::WeatherUnavailable,
                )
            }
        }
    }

    /// Ask for the position; no answer within the timeout counts as a refusal
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        tokio::time::timeout(self.position_timeout, self.geolocator.current_position())
            .await
            .unwrap_or(Err(GeolocationError::Timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocation::{FixedPosition, NoGeolocation};
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    struct Refusing;

    #[async_trait]
    impl Geolocator for Refusing {
        async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
            Err(GeolocationError::PermissionDenied)
        }
    }

    struct Silent;

    #[async_trait]
    impl Geolocator for Silent {
        async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
            std::future::pending().await
        }
    }

    fn provider(geolocator: impl Geolocator + 'static) -> ContextProvider {
        ContextProvider::new(Arc::new(geolocator), None, Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_unsupported_geolocation_uses_default_location() {
        let context = provider(NoGeolocation).acquire_weather().await;
        assert_eq!(context.weather, WeatherContext::default_location());
        assert_eq!(context.advisory, Some(ContextAdvisory::GeolocationUnsupported));
    }

    #[tokio::test]
    async fn test_denied_permission_uses_default_location() {
        let context = provider(Refusing).acquire_weather().await;
        assert_eq!(context.weather.location_label, "Default Location");
        assert_eq!(context.advisory, Some(ContextAdvisory::PermissionDenied));
    }

    #[tokio::test]
    async fn test_position_timeout_counts_as_denied() {
        let context = provider(Silent).acquire_weather().await;
        assert_eq!(context.weather, WeatherContext::default_location());
        assert_eq!(context.advisory, Some(ContextAdvisory::PermissionDenied));
    }

    #[tokio::test]
    async fn test_missing_key_is_silent_fallback() {
        let position = FixedPosition::new(Coordinates::new(Decimal::new(309, 1), Decimal::new(758, 1)));
        let context = provider(position).acquire_weather().await;
        assert_eq!(context.weather, WeatherContext::your_location());
        assert!(!context.is_degraded());
    }
}
