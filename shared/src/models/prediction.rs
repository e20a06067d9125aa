//! Prediction requests and results

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PredictionError;

/// The backend prediction services the dashboard talks to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PredictionService {
    Crop,
    Fertilizer,
    PlantWatering,
    Yield,
}

impl PredictionService {
    /// Endpoint path relative to the service base URL
    pub fn path(&self) -> &'static str {
        match self {
            PredictionService::Crop => "/api/crop-prediction",
            PredictionService::Fertilizer => "/api/fertilizer-prediction",
            PredictionService::PlantWatering => "/api/plant-watering",
            PredictionService::Yield => "/api/predict-yield",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PredictionService::Crop => "crop",
            PredictionService::Fertilizer => "fertilizer",
            PredictionService::PlantWatering => "plant_watering",
            PredictionService::Yield => "yield",
        }
    }
}

/// `POST /api/fertilizer-prediction` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FertilizerRequest {
    pub crop_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub moisture: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub nitrogen: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub potassium: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub phosphorous: Decimal,
}

/// `POST /api/plant-watering` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlantWateringRequest {
    pub crop_type: String,
    pub soil_type: String,
    pub region: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub temperature: Decimal,
    pub weather_condition: String,
    #[serde(with = "local_minute")]
    pub last_watering: NaiveDateTime,
}

/// `POST /api/predict-yield` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YieldRequest {
    #[serde(rename = "Area", with = "rust_decimal::serde::float")]
    pub area: Decimal,
    #[serde(rename = "State_Name")]
    pub state_name: String,
    #[serde(rename = "District_Name")]
    pub district_name: String,
    #[serde(rename = "Season")]
    pub season: String,
    #[serde(rename = "Crop")]
    pub crop: String,
}

/// A request addressed to one prediction service
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionRequest {
    /// Crop prediction carries no body, only the bearer token
    Crop,
    Fertilizer(FertilizerRequest),
    PlantWatering(PlantWateringRequest),
    Yield(YieldRequest),
}

impl PredictionRequest {
    pub fn service(&self) -> PredictionService {
        match self {
            PredictionRequest::Crop => PredictionService::Crop,
            PredictionRequest::Fertilizer(_) => PredictionService::Fertilizer,
            PredictionRequest::PlantWatering(_) => PredictionService::PlantWatering,
            PredictionRequest::Yield(_) => PredictionService::Yield,
        }
    }

    /// Client-side checks that must pass before anything is transmitted
    pub fn validate(&self) -> Result<(), PredictionError> {
        match self {
            PredictionRequest::Crop => Ok(()),
            PredictionRequest::Fertilizer(r) => crate::validation::validate_fertilizer_request(r),
            PredictionRequest::PlantWatering(r) => crate::validation::validate_watering_request(r),
            PredictionRequest::Yield(r) => crate::validation::validate_yield_request(r),
        }
    }
}

/// One entry of a ranked prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedEntry {
    /// 1-based position in the order the service reported it
    pub sequence: usize,
    pub label: String,
    /// Percentage in 0..=100
    pub probability: f64,
}

/// Labels ranked by probability, highest first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedList {
    pub entries: Vec<RankedEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
}

impl RankedList {
    /// Number entries in service order, then sort descending by probability.
    ///
    /// The sort is stable, so equal probabilities keep service order.
    pub fn from_service_order<I>(items: I, season: Option<String>) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut entries: Vec<RankedEntry> = items
            .into_iter()
            .enumerate()
            .map(|(i, (label, probability))| RankedEntry {
                sequence: i + 1,
                label,
                probability,
            })
            .collect();
        entries.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        Self { entries, season }
    }
}

/// A numeric prediction with its unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
    /// Hours elapsed since the last watering, when the service reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_hours: Option<f64>,
}

/// Typed outcome of a successful prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PredictionResult {
    RankedList(RankedList),
    SingleLabel { label: String },
    Quantity(Quantity),
}

/// `YYYY-MM-DDTHH:MM` local date-times, the format of a datetime-local input
pub mod local_minute {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        crate::validation::parse_local_datetime(&raw).map_err(de::Error::custom)
    }
}
