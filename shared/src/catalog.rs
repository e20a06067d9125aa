//! Static selection lists used by the prediction forms

/// Crop types offered by the fertilizer form when the catalog service is unreachable
pub const DEFAULT_FERTILIZER_CROPS: &[&str] = &[
    "Wheat",
    "Rice",
    "Maize",
    "Cotton",
    "Sugarcane",
    "Barley",
    "Groundnut",
    "Soybean",
    "Sunflower",
    "Potato",
    "Tomato",
    "Onion",
    "Cabbage",
    "Cauliflower",
    "Brinjal",
    "Chilli",
];

/// Crop types accepted by the plant watering form
pub const WATERING_CROPS: &[&str] = &[
    "Rice", "Wheat", "Maize", "Cotton", "Sugarcane", "Tomato", "Potato", "Bean", "Cabbage",
    "Citrus", "Melon", "Mustard", "Onion", "Banana", "Soyabean",
];

/// Soil types accepted by the plant watering form
pub const SOIL_TYPES: &[&str] = &["Sandy", "Loamy", "Clay", "Silt", "Peaty", "Chalky"];

/// Climate regions accepted by the plant watering form
pub const REGIONS: &[&str] = &["Tropical", "Temperate", "Arid", "Semi-Arid", "Humid"];

/// Selectable fertilizer crop types, authoritative when loaded from the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropCatalog {
    crops: Vec<String>,
    from_service: bool,
}

impl CropCatalog {
    /// The hard-coded list used until (or instead of) the service list
    pub fn fallback() -> Self {
        Self {
            crops: DEFAULT_FERTILIZER_CROPS.iter().map(|c| c.to_string()).collect(),
            from_service: false,
        }
    }

    /// Replace the fallback with a service-provided list; an empty list keeps the fallback
    pub fn from_service(crops: Vec<String>) -> Self {
        if crops.is_empty() {
            return Self::fallback();
        }
        Self {
            crops,
            from_service: true,
        }
    }

    pub fn crops(&self) -> &[String] {
        &self.crops
    }

    pub fn is_from_service(&self) -> bool {
        self.from_service
    }
}

impl Default for CropCatalog {
    fn default() -> Self {
        Self::fallback()
    }
}
