//! FarmFlow dashboard client
//!
//! Gates every prediction behind a verified session, enriches the watering
//! form with live weather and submits requests to the FarmFlow prediction
//! services.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod external;
pub mod geolocation;
pub mod services;
pub mod storage;

pub use config::Config;
pub use error::{ClientError, ClientResult};

use external::{http_client, AuthClient, PredictionClient, WeatherClient};
use geolocation::Geolocator;
use services::{ContextProvider, PredictionOrchestrator, SessionGuard};
use storage::SessionStore;

/// Dashboard state shared by every command
#[derive(Clone)]
pub struct Dashboard {
    pub config: Arc<Config>,
    pub store: SessionStore,
    pub guard: SessionGuard,
    pub context: ContextProvider,
    pub orchestrator: PredictionOrchestrator,
}

impl Dashboard {
    /// Wire the dashboard from configuration, with file-backed session storage
    /// and the configured device position
    pub fn from_config(config: Config) -> ClientResult<Self> {
        let store = SessionStore::file(&config.storage.session_path);
        let geolocator: Arc<dyn Geolocator> = Arc::from(geolocation::from_config(&config.geolocation));
        Self::build(config, store, geolocator)
    }

    pub fn build(
        config: Config,
        store: SessionStore,
        geolocator: Arc<dyn Geolocator>,
    ) -> ClientResult<Self> {
        let client = http_client(config.http.timeout())?;

        let auth = AuthClient::new(client.clone(), &config.services.auth_url);
        let predictions = PredictionClient::new(
            client.clone(),
            &config.services.prediction_url,
            &config.services.yield_url,
            &config.services.fertilizer_catalog_url,
        );
        let weather = config.weather.api_key().map(|key| {
            WeatherClient::with_base_url(
                client.clone(),
                key.to_string(),
                config.weather.api_endpoint.clone(),
            )
        });

        Ok(Self {
            guard: SessionGuard::new(store.clone(), auth),
            context: ContextProvider::new(geolocator, weather, config.geolocation.timeout()),
            orchestrator: PredictionOrchestrator::new(predictions, store.clone()),
            store,
            config: Arc::new(config),
        })
    }
}
