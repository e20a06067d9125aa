//! Common types used across the dashboard

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates reported by the device
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl Coordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Views the dashboard can send the user to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Unauthenticated entry point
    Landing,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
        }
    }
}

/// Measurement unit reported for yield estimates
pub const YIELD_UNIT: &str = "tonnes";
