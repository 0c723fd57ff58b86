//! Feature engineering for the demand model
//!
//! Builds the raw input vector in the exact column order the model was
//! trained on.

use super::cursor::TimeCursor;

/// Number of model input features.
pub const FEATURE_COUNT: usize = 6;

/// Training column order. The input scaler and weights follow this order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "hour_of_day",
    "day_of_week",
    "is_weekend",
    "previous_load",
    "temperature",
    "humidity",
];

/// Raw (unnormalized) features for one forecast step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadFeatures {
    /// Hour of day (0-23)
    pub hour_of_day: u32,
    /// Day of week (0=Monday, 6=Sunday)
    pub day_of_week: u32,
    /// Saturday or Sunday
    pub is_weekend: bool,
    /// Load of the preceding step, or the seed load for step 1 (MW)
    pub previous_load_mw: f64,
    /// Temperature (Celsius)
    pub temperature_c: f64,
    /// Relative humidity (%)
    pub humidity_percent: f64,
}

impl LoadFeatures {
    pub fn new(
        cursor: TimeCursor,
        previous_load_mw: f64,
        temperature_c: f64,
        humidity_percent: f64,
    ) -> Self {
        Self {
            hour_of_day: cursor.hour(),
            day_of_week: cursor.weekday(),
            is_weekend: cursor.is_weekend(),
            previous_load_mw,
            temperature_c,
            humidity_percent,
        }
    }

    /// Vector in [`FEATURE_NAMES`] order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.hour_of_day),
            f64::from(self.day_of_week),
            if self.is_weekend { 1.0 } else { 0.0 },
            self.previous_load_mw,
            self.temperature_c,
            self.humidity_percent,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order() {
        let features = LoadFeatures::new(TimeCursor::new(14, 5), 2800.0, 33.5, 78.0);
        assert_eq!(features.to_array(), [14.0, 5.0, 1.0, 2800.0, 33.5, 78.0]);
    }

    #[test]
    fn test_weekday_flag() {
        let features = LoadFeatures::new(TimeCursor::new(0, 4), 0.0, 0.0, 0.0);
        assert!(!features.is_weekend);
        assert_eq!(features.to_array()[2], 0.0);
    }

    #[test]
    fn test_feature_names_match_count() {
        assert_eq!(FEATURE_NAMES.len(), FEATURE_COUNT);
        assert_eq!(FEATURE_NAMES[3], "previous_load");
    }
}
