//! Weather context used to enrich plant watering requests

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Label used when no coordinates could be obtained
pub const DEFAULT_LOCATION: &str = "Default Location";

/// Label used when coordinates were obtained but the weather lookup was not
pub const YOUR_LOCATION: &str = "Your Location";

/// Current weather at the device location.
///
/// Always fully populated: either every field comes from the weather
/// provider, or every field comes from [`WeatherContext::fallback`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherContext {
    #[serde(with = "rust_decimal::serde::float")]
    pub temperature: Decimal,
    pub condition: String,
    pub description: String,
    pub humidity: i32,
    pub location_label: String,
}

impl WeatherContext {
    /// The fixed default tuple {25, "Clear", "clear sky", 60} tagged with a location label
    pub fn fallback(location_label: impl Into<String>) -> Self {
        Self {
            temperature: Decimal::from(25),
            condition: "Clear".to_string(),
            description: "clear sky".to_string(),
            humidity: 60,
            location_label: location_label.into(),
        }
    }

    /// Default weather when no coordinates are available
    pub fn default_location() -> Self {
        Self::fallback(DEFAULT_LOCATION)
    }

    /// Default weather when coordinates are known but no provider data is
    pub fn your_location() -> Self {
        Self::fallback(YOUR_LOCATION)
    }
}

/// Non-blocking notice that the weather context was degraded
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContextAdvisory {
    GeolocationUnsupported,
    PermissionDenied,
    WeatherUnavailable,
}

impl ContextAdvisory {
    pub fn message(&self) -> &'static str {
        match self {
            ContextAdvisory::GeolocationUnsupported => {
                "Geolocation is not supported on this device. Using default weather values."
            }
            ContextAdvisory::PermissionDenied => {
                "Location permission denied. Using default weather values."
            }
            ContextAdvisory::WeatherUnavailable => {
                "Could not fetch weather data. Using default values."
            }
        }
    }
}

/// Outcome of context enrichment: a usable context plus an optional advisory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedContext {
    pub weather: WeatherContext,
    pub advisory: Option<ContextAdvisory>,
}

impl EnrichedContext {
    pub fn live(weather: WeatherContext) -> Self {
        Self {
            weather,
            advisory: None,
        }
    }

    pub fn degraded(weather: WeatherContext, advisory: ContextAdvisory) -> Self {
        Self {
            weather,
            advisory: Some(advisory),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.advisory.is_some()
    }
}
