//! Client-side validation and numeric coercion for the prediction forms
//!
//! Nothing reaches a prediction service unless it passes these checks.

use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PredictionError;
use crate::models::{
    AgronomicDefaults, FertilizerRequest, PlantWateringRequest, WeatherContext, YieldRequest,
};

// ============================================================================
// Field Validations
// ============================================================================

/// Validate soil moisture is a percentage
pub fn validate_moisture_content(moisture: Decimal) -> Result<(), &'static str> {
    if moisture < Decimal::ZERO || moisture > Decimal::from(100) {
        return Err("Moisture must be between 0 and 100%");
    }
    Ok(())
}

/// Validate a nutrient level (N, P or K) is not negative
pub fn validate_nutrient_level(level: Decimal) -> Result<(), &'static str> {
    if level < Decimal::ZERO {
        return Err("Nutrient levels cannot be negative");
    }
    Ok(())
}

/// Validate a cultivated area is positive
pub fn validate_area(area: Decimal) -> Result<(), &'static str> {
    if area <= Decimal::ZERO {
        return Err("Area must be greater than zero");
    }
    Ok(())
}

/// Validate a required text field is filled in
pub fn validate_required(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("This field is required");
    }
    Ok(())
}

/// Parse a datetime-local value, with or without seconds
pub fn parse_local_datetime(raw: &str) -> Result<NaiveDateTime, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("This field is required");
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .map_err(|_| "Must be a date and time in the format YYYY-MM-DDTHH:MM")
}

/// Coerce raw form text into a number; empty and non-numeric input is rejected
pub fn parse_number(field: &str, raw: &str) -> Result<Decimal, PredictionError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(PredictionError::validation(field, "This field is required"));
    }
    // `Decimal` accepts `1_000`; a number input does not
    if raw.contains('_') {
        return Err(PredictionError::validation(field, "Must be a valid number"));
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| PredictionError::validation(field, "Must be a valid number"))
}

fn check(field: &str, result: Result<(), &'static str>) -> Result<(), PredictionError> {
    result.map_err(|message| PredictionError::validation(field, message))
}

// ============================================================================
// Request Validations
// ============================================================================

pub fn validate_fertilizer_request(request: &FertilizerRequest) -> Result<(), PredictionError> {
    check("crop_type", validate_required(&request.crop_type))?;
    check("moisture", validate_moisture_content(request.moisture))?;
    check("nitrogen", validate_nutrient_level(request.nitrogen))?;
    check("potassium", validate_nutrient_level(request.potassium))?;
    check("phosphorous", validate_nutrient_level(request.phosphorous))?;
    Ok(())
}

pub fn validate_watering_request(request: &PlantWateringRequest) -> Result<(), PredictionError> {
    check("crop_type", validate_required(&request.crop_type))?;
    check("soil_type", validate_required(&request.soil_type))?;
    check("region", validate_required(&request.region))?;
    check("weather_condition", validate_required(&request.weather_condition))?;
    Ok(())
}

pub fn validate_yield_request(request: &YieldRequest) -> Result<(), PredictionError> {
    check("Area", validate_area(request.area))?;
    check("State_Name", validate_required(&request.state_name))?;
    check("District_Name", validate_required(&request.district_name))?;
    check("Season", validate_required(&request.season))?;
    check("Crop", validate_required(&request.crop))?;
    Ok(())
}

// ============================================================================
// Forms
// ============================================================================

/// Raw fertilizer form input, as typed by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FertilizerForm {
    #[serde(default)]
    pub crop_type: String,
    #[serde(default)]
    pub moisture: String,
    #[serde(default)]
    pub nitrogen: String,
    #[serde(default)]
    pub potassium: String,
    #[serde(default)]
    pub phosphorous: String,
}

impl FertilizerForm {
    /// A blank form with profile values filled in where available
    pub fn prefilled(defaults: &AgronomicDefaults) -> Self {
        Self {
            crop_type: defaults.crop_type.clone().unwrap_or_default(),
            moisture: String::new(),
            nitrogen: defaults.nitrogen.clone().unwrap_or_default(),
            potassium: defaults.potassium.clone().unwrap_or_default(),
            phosphorous: defaults.phosphorous.clone().unwrap_or_default(),
        }
    }

    pub fn to_request(&self) -> Result<FertilizerRequest, PredictionError> {
        check("crop_type", validate_required(&self.crop_type))?;
        let request = FertilizerRequest {
            crop_type: self.crop_type.trim().to_string(),
            moisture: parse_number("moisture", &self.moisture)?,
            nitrogen: parse_number("nitrogen", &self.nitrogen)?,
            potassium: parse_number("potassium", &self.potassium)?,
            phosphorous: parse_number("phosphorous", &self.phosphorous)?,
        };
        validate_fertilizer_request(&request)?;
        Ok(request)
    }
}

/// Raw plant watering form input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlantWateringForm {
    pub crop_type: String,
    pub soil_type: String,
    pub region: String,
    #[serde(default)]
    pub last_watering: String,
}

impl Default for PlantWateringForm {
    fn default() -> Self {
        Self {
            crop_type: "Rice".to_string(),
            soil_type: "Loamy".to_string(),
            region: "Temperate".to_string(),
            last_watering: String::new(),
        }
    }
}

impl PlantWateringForm {
    /// Merge the form with a resolved weather context
    pub fn to_request(&self, weather: &WeatherContext) -> Result<PlantWateringRequest, PredictionError> {
        let last_watering = parse_local_datetime(&self.last_watering)
            .map_err(|message| PredictionError::validation("last_watering", message))?;
        let request = PlantWateringRequest {
            crop_type: self.crop_type.trim().to_string(),
            soil_type: self.soil_type.trim().to_string(),
            region: self.region.trim().to_string(),
            temperature: weather.temperature,
            weather_condition: weather.condition.clone(),
            last_watering,
        };
        validate_watering_request(&request)?;
        Ok(request)
    }
}

/// Raw yield estimation form input
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct YieldForm {
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub state_name: String,
    #[serde(default)]
    pub district_name: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub crop: String,
}

impl YieldForm {
    pub fn to_request(&self) -> Result<YieldRequest, PredictionError> {
        let request = YieldRequest {
            area: parse_number("Area", &self.area)?,
            state_name: self.state_name.trim().to_string(),
            district_name: self.district_name.trim().to_string(),
            season: self.season.trim().to_string(),
            crop: self.crop.trim().to_string(),
        };
        validate_yield_request(&request)?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn fertilizer_form(moisture: &str) -> FertilizerForm {
        FertilizerForm {
            crop_type: "Wheat".into(),
            moisture: moisture.into(),
            nitrogen: "50".into(),
            potassium: "40".into(),
            phosphorous: "30".into(),
        }
    }

    fn field_of(err: PredictionError) -> String {
        match err {
            PredictionError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    // ========================================================================
    // Field Validation Tests
    // ========================================================================

    #[test]
    fn test_moisture_content_validation() {
        assert!(validate_moisture_content(dec("45")).is_ok());
        assert!(validate_moisture_content(Decimal::ZERO).is_ok());
        assert!(validate_moisture_content(Decimal::from(100)).is_ok());
        assert!(validate_moisture_content(Decimal::from(-1)).is_err());
        assert!(validate_moisture_content(dec("100.1")).is_err());
    }

    #[test]
    fn test_nutrient_level_validation() {
        assert!(validate_nutrient_level(Decimal::ZERO).is_ok());
        assert!(validate_nutrient_level(dec("250")).is_ok());
        assert!(validate_nutrient_level(dec("-0.5")).is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("moisture", " 45 ").unwrap(), dec("45"));
        assert_eq!(parse_number("moisture", "12.75").unwrap(), dec("12.75"));
        assert_eq!(field_of(parse_number("moisture", "").unwrap_err()), "moisture");
        assert_eq!(field_of(parse_number("nitrogen", "lots").unwrap_err()), "nitrogen");
    }

    #[test]
    fn test_parse_number_rejects_digit_separators() {
        for raw in ["1_000", "4_5.5", "1_0e2"] {
            assert_eq!(
                parse_number("nitrogen", raw).unwrap_err(),
                PredictionError::validation("nitrogen", "Must be a valid number")
            );
        }
    }

    #[test]
    fn test_parse_local_datetime() {
        assert!(parse_local_datetime("2024-06-01T07:30").is_ok());
        assert!(parse_local_datetime("2024-06-01T07:30:15").is_ok());
        assert!(parse_local_datetime("").is_err());
        assert!(parse_local_datetime("yesterday").is_err());
    }

    // ========================================================================
    // Form Tests
    // ========================================================================

    #[test]
    fn test_fertilizer_form_valid() {
        let request = fertilizer_form("45").to_request().unwrap();
        assert_eq!(request.crop_type, "Wheat");
        assert_eq!(request.moisture, dec("45"));
        assert_eq!(request.phosphorous, dec("30"));
    }

    #[test]
    fn test_fertilizer_form_rejects_negative_moisture() {
        let err = fertilizer_form("-1").to_request().unwrap_err();
        assert_eq!(field_of(err), "moisture");
    }

    #[test]
    fn test_fertilizer_form_rejects_missing_fields() {
        let mut form = fertilizer_form("45");
        form.crop_type = "  ".into();
        assert_eq!(field_of(form.to_request().unwrap_err()), "crop_type");

        let mut form = fertilizer_form("45");
        form.potassium.clear();
        assert_eq!(field_of(form.to_request().unwrap_err()), "potassium");
    }

    #[test]
    fn test_fertilizer_form_rejects_negative_nutrients() {
        let mut form = fertilizer_form("45");
        form.phosphorous = "-3".into();
        assert_eq!(field_of(form.to_request().unwrap_err()), "phosphorous");
    }

    #[test]
    fn test_fertilizer_form_prefilled_from_profile() {
        let defaults = AgronomicDefaults {
            crop_type: Some("Rice".into()),
            nitrogen: Some("20".into()),
            phosphorous: None,
            potassium: Some("10".into()),
        };
        let form = FertilizerForm::prefilled(&defaults);
        assert_eq!(form.crop_type, "Rice");
        assert_eq!(form.nitrogen, "20");
        assert_eq!(form.phosphorous, "");
        assert_eq!(form.moisture, "");
    }

    #[test]
    fn test_watering_form_merges_weather() {
        let form = PlantWateringForm {
            last_watering: "2024-06-01T07:30".into(),
            ..PlantWateringForm::default()
        };
        let request = form.to_request(&WeatherContext::your_location()).unwrap();
        assert_eq!(request.crop_type, "Rice");
        assert_eq!(request.soil_type, "Loamy");
        assert_eq!(request.temperature, Decimal::from(25));
        assert_eq!(request.weather_condition, "Clear");
    }

    #[test]
    fn test_watering_form_requires_last_watering() {
        let err = PlantWateringForm::default()
            .to_request(&WeatherContext::default_location())
            .unwrap_err();
        assert_eq!(field_of(err), "last_watering");
    }

    #[test]
    fn test_yield_form() {
        let form = YieldForm {
            area: "3.5".into(),
            state_name: "Punjab".into(),
            district_name: "Ludhiana".into(),
            season: "Rabi".into(),
            crop: "Wheat".into(),
        };
        assert_eq!(form.to_request().unwrap().area, dec("3.5"));

        let zero_area = YieldForm {
            area: "0".into(),
            ..form.clone()
        };
        assert_eq!(field_of(zero_area.to_request().unwrap_err()), "Area");

        let no_district = YieldForm {
            district_name: String::new(),
            ..form
        };
        assert_eq!(field_of(no_district.to_request().unwrap_err()), "District_Name");
    }
}
