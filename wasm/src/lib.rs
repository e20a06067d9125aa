//! WebAssembly module for the FarmFlow dashboard
//!
//! Lets the browser run the same rules as the native client:
//! - form validation before submission
//! - classification of prediction service replies
//! - render-ready blocks for outcomes
//!
//! Values cross the boundary as JSON strings. Results are serialized as
//! `{"Ok": ...}` or `{"Err": ...}`.

use serde::Serialize;
use shared::{FertilizerForm, Outcome, PlantWateringForm, PredictionError, WeatherContext};
use wasm_bindgen::prelude::*;

/// Validate a fertilizer form; yields the request body to send or the first error
#[wasm_bindgen]
pub fn validate_fertilizer_form(form_json: &str) -> Result<String, JsValue> {
    let result = parse_input::<FertilizerForm>(form_json).and_then(|form| form.to_request());
    to_json(&result)
}

/// Validate a plant watering form against the resolved weather context
#[wasm_bindgen]
pub fn validate_watering_form(form_json: &str, weather_json: &str) -> Result<String, JsValue> {
    let result = parse_input::<PlantWateringForm>(form_json).and_then(|form| {
        let weather = parse_input::<WeatherContext>(weather_json)?;
        form.to_request(&weather)
    });
    to_json(&result)
}

/// Classify a crop prediction reply
#[wasm_bindgen]
pub fn interpret_crop_response(status: u16, body: &str) -> Result<String, JsValue> {
    to_json(&shared::interpret_crop_response(status, body))
}

/// Classify a fertilizer prediction reply
#[wasm_bindgen]
pub fn interpret_fertilizer_response(status: u16, body: &str) -> Result<String, JsValue> {
    to_json(&shared::interpret_fertilizer_response(status, body))
}

/// Classify a plant watering reply
#[wasm_bindgen]
pub fn interpret_watering_response(status: u16, body: &str) -> Result<String, JsValue> {
    to_json(&shared::interpret_watering_response(status, body))
}

/// Turn a serialized outcome into a render block
#[wasm_bindgen]
pub fn render_outcome(outcome_json: &str) -> Result<String, JsValue> {
    let outcome: Outcome = serde_json::from_str(outcome_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid outcome JSON: {}", e)))?;
    to_json(&shared::render_outcome(&outcome))
}

/// The fallback weather used when the device location is unknown
#[wasm_bindgen]
pub fn default_weather() -> Result<String, JsValue> {
    to_json(&WeatherContext::default_location())
}

fn parse_input<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, PredictionError> {
    serde_json::from_str(raw).map_err(|e| {
        warn(&format!("Rejected malformed form input: {}", e));
        PredictionError::validation("form", "Malformed form data")
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(target_arch = "wasm32")]
fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

#[cfg(not(target_arch = "wasm32"))]
fn warn(_message: &str) {}
