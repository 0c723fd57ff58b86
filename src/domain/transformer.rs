use serde::{Deserialize, Serialize};
use validator::Validate;

/// Geographic location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct GeoLocation {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Human-readable label, e.g. `19.0671°N 72.8657°E`.
    pub fn label(&self) -> String {
        format!("{:.4}°N {:.4}°E", self.latitude, self.longitude)
    }
}

/// Distribution transformer reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Transformer {
    #[validate(length(min = 1))]
    pub name: String,
    /// Rated capacity (MW)
    #[validate(range(exclusive_min = 0.0))]
    pub capacity_mw: f64,
    /// Currently observed load (MW), used to seed the forecast
    #[validate(range(min = 0.0))]
    pub current_load_mw: f64,
    #[serde(flatten)]
    #[validate(nested)]
    pub location: GeoLocation,
}

impl Transformer {
    pub fn new(
        name: impl Into<String>,
        capacity_mw: f64,
        current_load_mw: f64,
        location: GeoLocation,
    ) -> Self {
        Self {
            name: name.into(),
            capacity_mw,
            current_load_mw,
            location,
        }
    }
}
