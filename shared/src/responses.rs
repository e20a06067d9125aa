//! Interpretation of prediction service responses
//!
//! Every service reply is reduced to one of three outcome classes:
//! - success: a typed [`PredictionResult`]
//! - domain rejection: a structured error body the user can act on
//! - transport failure: anything that is not a usable, parseable reply
//!
//! A 401 is neither; it means the token is no longer accepted.

use serde::Deserialize;
use serde_json::Value;

use crate::catalog::CropCatalog;
use crate::error::{PredictionError, Unauthenticated};
use crate::models::{PredictionResult, PredictionService, Quantity, RankedList};
use crate::types::YIELD_UNIT;

/// Structured error payload shared by all prediction services
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    available_crops: Option<Vec<String>>,
}

impl ErrorBody {
    fn is_structured(&self) -> bool {
        self.error.is_some() || self.message.is_some() || self.available_crops.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct CropProbability {
    crop: String,
    probability: f64,
}

#[derive(Debug, Deserialize)]
struct CropPredictionBody {
    predictions: Vec<CropProbability>,
    #[serde(default)]
    season: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FertilizerBody {
    prediction: String,
}

#[derive(Debug, Deserialize)]
struct WateringBody {
    water_requirement: f64,
    unit: String,
    #[serde(default)]
    hours_since_watering: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YieldBody {
    predicted_yield: f64,
}

#[derive(Debug, Deserialize)]
struct CropCatalogBody {
    #[serde(default)]
    available_crops: Vec<String>,
}

/// Interpret a reply from the given prediction service
pub fn interpret_response(
    service: PredictionService,
    status: u16,
    body: &str,
) -> Result<PredictionResult, PredictionError> {
    match service {
        PredictionService::Crop => interpret_crop_response(status, body),
        PredictionService::Fertilizer => interpret_fertilizer_response(status, body),
        PredictionService::PlantWatering => interpret_watering_response(status, body),
        PredictionService::Yield => interpret_yield_response(status, body),
    }
}

/// `POST /api/crop-prediction`: `{success, predictions: [{crop, probability}], season}`
pub fn interpret_crop_response(status: u16, body: &str) -> Result<PredictionResult, PredictionError> {
    let value = parse_body(status, body)?;
    let envelope = error_body(&value);
    if !is_success(status) || envelope.success != Some(true) {
        return Err(rejection_or_transport(
            status,
            envelope,
            MessagePreference::ErrorFirst,
            "Failed to load predictions",
        ));
    }

    let data: CropPredictionBody = decode(value)?;
    let items = data
        .predictions
        .into_iter()
        .map(|p| (canonical_crop(&p.crop), p.probability));
    Ok(PredictionResult::RankedList(RankedList::from_service_order(
        items,
        data.season.filter(|s| !s.is_empty()),
    )))
}

/// `POST /api/fertilizer-prediction`: `{success, prediction}` or
/// `{success: false, message, available_crops?}`
pub fn interpret_fertilizer_response(
    status: u16,
    body: &str,
) -> Result<PredictionResult, PredictionError> {
    let value = parse_body(status, body)?;
    let envelope = error_body(&value);
    let has_prediction = value.get("prediction").map_or(false, Value::is_string);
    // The raw model API omits the flag on success
    let succeeded = envelope.success.unwrap_or(has_prediction);
    if !is_success(status) || !succeeded {
        return Err(rejection_or_transport(
            status,
            envelope,
            MessagePreference::MessageFirst,
            "Failed to get fertilizer prediction",
        ));
    }

    let data: FertilizerBody = decode(value)?;
    Ok(PredictionResult::SingleLabel {
        label: data.prediction,
    })
}

/// `POST /api/plant-watering`: `{water_requirement, unit, hours_since_watering?}`
pub fn interpret_watering_response(
    status: u16,
    body: &str,
) -> Result<PredictionResult, PredictionError> {
    let value = parse_body(status, body)?;
    if !is_success(status) {
        return Err(rejection_or_transport(
            status,
            error_body(&value),
            MessagePreference::ErrorFirst,
            "Failed to get prediction.",
        ));
    }

    let data: WateringBody = decode(value)?;
    Ok(PredictionResult::Quantity(Quantity {
        value: data.water_requirement,
        unit: data.unit,
        elapsed_hours: data.hours_since_watering,
    }))
}

/// `POST /api/predict-yield`: `{predicted_yield}` or `{error}`
pub fn interpret_yield_response(status: u16, body: &str) -> Result<PredictionResult, PredictionError> {
    let value = parse_body(status, body)?;
    if !is_success(status) {
        return Err(rejection_or_transport(
            status,
            error_body(&value),
            MessagePreference::ErrorFirst,
            "Failed to estimate yield",
        ));
    }

    let data: YieldBody = decode(value)?;
    Ok(PredictionResult::Quantity(Quantity {
        value: data.predicted_yield,
        unit: YIELD_UNIT.to_string(),
        elapsed_hours: None,
    }))
}

/// `GET /crops`: any failure keeps the built-in list
pub fn interpret_crop_catalog(status: u16, body: &str) -> CropCatalog {
    if !is_success(status) {
        return CropCatalog::fallback();
    }
    serde_json::from_str::<CropCatalogBody>(body)
        .map(|data| CropCatalog::from_service(data.available_crops))
        .unwrap_or_else(|_| CropCatalog::fallback())
}

/// Canonical case for crop identifiers
pub fn canonical_crop(crop: &str) -> String {
    crop.trim().to_uppercase()
}

pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

enum MessagePreference {
    MessageFirst,
    ErrorFirst,
}

fn parse_body(status: u16, body: &str) -> Result<Value, PredictionError> {
    if status == 401 {
        return Err(Unauthenticated::token_refused(status).into());
    }
    serde_json::from_str(body).map_err(|e| {
        PredictionError::transport(format!("Malformed response body (status {}): {}", status, e))
    })
}

fn error_body(value: &Value) -> ErrorBody {
    if !value.is_object() {
        return ErrorBody::default();
    }
    serde_json::from_value(value.clone()).unwrap_or_default()
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, PredictionError> {
    serde_json::from_value(value)
        .map_err(|e| PredictionError::transport(format!("Unexpected response shape: {}", e)))
}

fn rejection_or_transport(
    status: u16,
    body: ErrorBody,
    preference: MessagePreference,
    fallback: &str,
) -> PredictionError {
    // A success status with success=false is a rejection even without detail
    if !body.is_structured() && !is_success(status) {
        return PredictionError::transport(format!("Service returned status {}", status));
    }
    let message = match preference {
        MessagePreference::MessageFirst => body.message.or(body.error),
        MessagePreference::ErrorFirst => body.error.or(body.message),
    }
    .filter(|m| !m.trim().is_empty())
    .unwrap_or_else(|| fallback.to_string());

    PredictionError::DomainRejection {
        message,
        supported_values: body.available_crops,
    }
}
