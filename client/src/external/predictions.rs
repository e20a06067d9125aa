//! Prediction service client
//!
//! Sends a validated [`PredictionRequest`] to its service and hands the raw
//! status and body to the shared response interpreters.

use reqwest::Client;
use shared::{
    interpret_crop_catalog, interpret_response, CropCatalog, PredictionError, PredictionRequest,
    PredictionResult, PredictionService,
};

use super::{describe, endpoint};

/// Client for the crop, fertilizer, plant watering and yield services
#[derive(Clone)]
pub struct PredictionClient {
    client: Client,
    prediction_url: String,
    yield_url: String,
    catalog_url: String,
}

impl PredictionClient {
    pub fn new(
        client: Client,
        prediction_url: impl Into<String>,
        yield_url: impl Into<String>,
        catalog_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            prediction_url: prediction_url.into(),
            yield_url: yield_url.into(),
            catalog_url: catalog_url.into(),
        }
    }

    fn url_for(&self, service: PredictionService) -> String {
        let base = match service {
            PredictionService::Yield => &self.yield_url,
            _ => &self.prediction_url,
        };
        endpoint(base, service.path())
    }

    /// Issue one authenticated prediction call. No retries.
    pub async fn send(
        &self,
        token: &str,
        request: &PredictionRequest,
    ) -> Result<PredictionResult, PredictionError> {
        let service = request.service();
        let builder = self.client.post(self.url_for(service)).bearer_auth(token);
        let builder = match request {
            PredictionRequest::Crop => builder,
            PredictionRequest::Fertilizer(body) => builder.json(body),
            PredictionRequest::PlantWatering(body) => builder.json(body),
            PredictionRequest::Yield(body) => builder.json(body),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| PredictionError::transport(describe(&e)))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| PredictionError::transport(describe(&e)))?;

        tracing::debug!("{} service answered with status {}", service.name(), status);
        interpret_response(service, status, &body)
    }

    /// Load the selectable fertilizer crop types; falls back to the built-in list
    pub async fn fetch_crop_catalog(&self) -> CropCatalog {
        let response = match self.client.get(endpoint(&self.catalog_url, "/crops")).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Error fetching crops, using default list: {}", describe(&e));
                return CropCatalog::fallback();
            }
        };

        let status = response.status().as_u16();
        let catalog = match response.text().await {
            Ok(body) => interpret_crop_catalog(status, &body),
            Err(e) => {
                tracing::warn!("Error reading crop list, using default list: {}", describe(&e));
                CropCatalog::fallback()
            }
        };

        if catalog.is_from_service() {
            tracing::info!("Loaded {} available crops from API", catalog.crops().len());
        } else {
            tracing::warn!("Could not fetch crops from API (status {}), using default list", status);
        }
        catalog
    }
}
