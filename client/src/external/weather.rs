//! Weather API client for fetching current conditions
//!
//! Integrates with the OpenWeatherMap current weather endpoint

use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{Coordinates, WeatherContext, YOUR_LOCATION};

use super::describe;
use crate::error::{ClientError, ClientResult};

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    weather: Vec<OWMWeather>,
    main: OWMMain,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    humidity: i32,
}

impl WeatherClient {
    /// Create a new WeatherClient with custom base URL
    pub fn with_base_url(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Fetch current weather conditions by GPS coordinates
    pub async fn get_current_weather(&self, coordinates: Coordinates) -> ClientResult<WeatherContext> {
        let url = format!("{}/weather", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                ClientError::WeatherServiceUnavailable(format!("request failed: {}", describe(&e)))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::WeatherServiceUnavailable(format!(
                "{} - {}",
                status, body
            )));
        }

        let data: OWMCurrentResponse = response.json().await.map_err(|e| {
            ClientError::WeatherServiceUnavailable(format!("failed to parse weather response: {}", e))
        })?;

        convert_current_response(data)
    }
}

/// Convert an OpenWeatherMap response; any missing piece rejects the whole response
fn convert_current_response(data: OWMCurrentResponse) -> ClientResult<WeatherContext> {
    let weather = data.weather.into_iter().next().ok_or_else(|| {
        ClientError::WeatherServiceUnavailable("response has no weather conditions".into())
    })?;
    let temperature = Decimal::from_f64(data.main.temp).ok_or_else(|| {
        ClientError::WeatherServiceUnavailable(format!("invalid temperature {}", data.main.temp))
    })?;
    let location_label = if data.name.trim().is_empty() {
        YOUR_LOCATION.to_string()
    } else {
        data.name
    };

    Ok(WeatherContext {
        temperature,
        condition: weather.main,
        description: weather.description,
        humidity: data.main.humidity,
        location_label,
    })
}
