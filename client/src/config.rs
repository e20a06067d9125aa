//! Configuration management for the FarmFlow client
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with FARMFLOW_ prefix

use std::path::PathBuf;
use std::time::Duration;

use config::{Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::Coordinates;

use crate::error::{ClientError, ClientResult};

/// Main client configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Backend service locations
    pub services: ServicesConfig,

    /// Weather provider configuration
    pub weather: WeatherConfig,

    /// Device location configuration
    pub geolocation: GeolocationConfig,

    /// Local session storage
    pub storage: StorageConfig,

    /// HTTP client behaviour
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    /// Authentication service (verify-token, profile, logout)
    pub auth_url: String,

    /// Prediction gateway (crop, fertilizer, plant watering)
    pub prediction_url: String,

    /// Fertilizer model API serving the crop catalog
    pub fertilizer_catalog_url: String,

    /// Yield estimation service
    pub yield_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key; absent or empty disables the weather lookup
    #[serde(default)]
    pub api_key: Option<String>,
}

impl WeatherConfig {
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeolocationConfig {
    #[serde(default)]
    pub latitude: Option<Decimal>,

    #[serde(default)]
    pub longitude: Option<Decimal>,

    /// How long to wait for a position before treating it as denied
    pub timeout_secs: u64,
}

impl GeolocationConfig {
    /// Configured device position, if both coordinates are set
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// File holding the persisted token and user record
    pub session_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> ClientResult<Self> {
        let environment =
            std::env::var("FARMFLOW_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("services.auth_url", "http://localhost:5000")?
            .set_default("services.prediction_url", "http://localhost:5000")?
            .set_default("services.fertilizer_catalog_url", "http://localhost:5002")?
            .set_default("services.yield_url", "http://127.0.0.1:7860")?
            .set_default("weather.api_endpoint", "https://api.openweathermap.org/data/2.5")?
            .set_default("geolocation.timeout_secs", 10)?
            .set_default("storage.session_path", ".farmflow/session.json")?
            .set_default("http.timeout_secs", 30)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FARMFLOW_ prefix)
            .add_source(
                Environment::with_prefix("FARMFLOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the clients cannot work with
    pub fn validate(&self) -> ClientResult<()> {
        let services = [
            ("services.auth_url", &self.services.auth_url),
            ("services.prediction_url", &self.services.prediction_url),
            ("services.fertilizer_catalog_url", &self.services.fertilizer_catalog_url),
            ("services.yield_url", &self.services.yield_url),
            ("weather.api_endpoint", &self.weather.api_endpoint),
        ];
        for (key, url) in services {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ClientError::InvalidConfiguration(format!(
                    "{} must be an http(s) URL, got '{}'",
                    key, url
                )));
            }
        }
        if self.http.timeout_secs == 0 {
            return Err(ClientError::InvalidConfiguration(
                "http.timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Configuration pointing every service at one base URL
    pub fn for_base_url(base_url: &str, session_path: impl Into<PathBuf>) -> Self {
        Self {
            environment: "test".to_string(),
            services: ServicesConfig {
                auth_url: base_url.to_string(),
                prediction_url: base_url.to_string(),
                fertilizer_catalog_url: base_url.to_string(),
                yield_url: base_url.to_string(),
            },
            weather: WeatherConfig {
                api_endpoint: base_url.to_string(),
                api_key: None,
            },
            geolocation: GeolocationConfig {
                latitude: None,
                longitude: None,
                timeout_secs: 10,
            },
            storage: StorageConfig {
                session_path: session_path.into(),
            },
            http: HttpConfig { timeout_secs: 30 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_weather_key_disables_lookup() {
        let mut weather = WeatherConfig {
            api_endpoint: "http://weather".into(),
            api_key: Some("  ".into()),
        };
        assert_eq!(weather.api_key(), None);
        weather.api_key = Some("abc123".into());
        assert_eq!(weather.api_key(), Some("abc123"));
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = Config::for_base_url("http://localhost:5000", "session.json");
        assert!(config.validate().is_ok());

        config.services.yield_url = "127.0.0.1:7860".into();
        assert!(matches!(
            config.validate(),
            Err(ClientError::InvalidConfiguration(_))
        ));

        config.services.yield_url = "http://127.0.0.1:7860".into();
        config.http.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_coordinates_need_both_axes() {
        let mut geo = GeolocationConfig {
            latitude: Some(Decimal::new(186, 1)),
            longitude: None,
            timeout_secs: 10,
        };
        assert!(geo.coordinates().is_none());
        geo.longitude = Some(Decimal::new(730, 1));
        assert!(geo.coordinates().is_some());
    }
}
