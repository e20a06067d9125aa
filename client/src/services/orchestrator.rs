//! Prediction request orchestration
//!
//! Validates a submission locally, sends it with the session's bearer token
//! and classifies the reply. An `Unauthenticated` outcome clears the session
//! before it is returned.

use shared::{
    CropCatalog, FertilizerForm, FormState, PlantWateringForm, PredictionError, PredictionRequest,
    PredictionResult, Session, WeatherContext, YieldForm,
};
use tokio::sync::Mutex;

use crate::external::PredictionClient;
use crate::storage::SessionStore;

#[derive(Clone)]
pub struct PredictionOrchestrator {
    client: PredictionClient,
    store: SessionStore,
}

impl PredictionOrchestrator {
    pub fn new(client: PredictionClient, store: SessionStore) -> Self {
        Self { client, store }
    }

    /// Submit one request. Invalid input never reaches the network.
    pub async fn submit(
        &self,
        session: &Session,
        request: PredictionRequest,
    ) -> Result<PredictionResult, PredictionError> {
        let service = request.service();
        if let Err(e) = request.validate() {
            tracing::debug!("{} request rejected locally: {}", service.name(), e);
            return Err(e);
        }

        tracing::info!("Submitting {} prediction request", service.name());
        let outcome = self.client.send(&session.token, &request).await;

        match &outcome {
            Ok(_) => tracing::info!("{} prediction succeeded", service.name()),
            Err(PredictionError::Unauthenticated(e)) => {
                tracing::warn!("{} service refused the session: {:?}", service.name(), e.reason);
                self.store.invalidate();
            }
            Err(PredictionError::DomainRejection { message, .. }) => {
                tracing::warn!("{} prediction rejected: {}", service.name(), message)
            }
            Err(e) => tracing::error!("{} prediction failed: {}", service.name(), e),
        }
        outcome
    }

    /// Submit on behalf of a form, applying the outcome only if the form has
    /// not been reset or resubmitted meanwhile. Returns whether it was applied.
    pub async fn submit_for(
        &self,
        form: &Mutex<FormState>,
        session: &Session,
        request: PredictionRequest,
    ) -> bool {
        let ticket = form.lock().await.begin();
        let outcome = self.submit(session, request).await;

        let applied = form.lock().await.apply(ticket, outcome);
        if !applied {
            tracing::debug!("Discarding stale reply for submission {}", ticket.generation());
        }
        applied
    }

    pub async fn predict_crops(&self, session: &Session) -> Result<PredictionResult, PredictionError> {
        self.submit(session, PredictionRequest::Crop).await
    }

    pub async fn predict_fertilizer(
        &self,
        session: &Session,
        form: &FertilizerForm,
    ) -> Result<PredictionResult, PredictionError> {
        let request = form.to_request()?;
        self.submit(session, PredictionRequest::Fertilizer(request)).await
    }

    /// The weather context is attached here; the form never carries it
    pub async fn predict_watering(
        &self,
        session: &Session,
        form: &PlantWateringForm,
        weather: &WeatherContext,
    ) -> Result<PredictionResult, PredictionError> {
        let request = form.to_request(weather)?;
        self.submit(session, PredictionRequest::PlantWatering(request)).await
    }

    pub async fn estimate_yield(
        &self,
        session: &Session,
        form: &YieldForm,
    ) -> Result<PredictionResult, PredictionError> {
        let request = form.to_request()?;
        self.submit(session, PredictionRequest::Yield(request)).await
    }

    pub async fn crop_catalog(&self) -> CropCatalog {
        self.client.fetch_crop_catalog().await
    }
}
