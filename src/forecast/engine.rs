use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::cursor::TimeCursor;
use super::features::LoadFeatures;
use crate::domain::{round1, LoadForecast, MAX_HORIZON_HOURS, MIN_HORIZON_HOURS};
use crate::ml::LinearLoadModel;

#[derive(Debug, Error, PartialEq)]
pub enum ForecastError {
    #[error("{series} series is empty; at least one value is required")]
    EmptyWeatherSeries { series: &'static str },
}

/// Inputs for one forecast run.
#[derive(Debug, Clone, Copy)]
pub struct ForecastRequest<'a> {
    /// Number of hourly steps, already bounded to 1..=24 by the caller
    pub horizon: u32,
    pub temperatures: &'a [f64],
    pub humidities: &'a [f64],
    /// Seed for the first step's previous-load feature (MW)
    pub initial_load_mw: f64,
}

/// Autoregressive load forecaster over a shared trained model.
#[derive(Debug, Clone)]
pub struct LoadForecaster {
    model: Arc<LinearLoadModel>,
}

impl LoadForecaster {
    pub fn new(model: Arc<LinearLoadModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &LinearLoadModel {
        &self.model
    }

    /// Chain one-hour predictions from `start`.
    ///
    /// Every step feeds its unrounded load into the next step's
    /// previous-load feature; rounding only applies to the recorded value.
    pub fn forecast(
        &self,
        request: &ForecastRequest<'_>,
        start: TimeCursor,
    ) -> Result<LoadForecast, ForecastError> {
        let last_temperature = last_index(request.temperatures, "temperature")?;
        let last_humidity = last_index(request.humidities, "humidity")?;
        debug_assert!((MIN_HORIZON_HOURS..=MAX_HORIZON_HOURS).contains(&request.horizon));

        let mut previous_load = request.initial_load_mw;
        let mut loads = Vec::with_capacity(request.horizon as usize);

        for (index, cursor) in start.take(request.horizon as usize).enumerate() {
            // Shorter series repeat their last value.
            let temperature = request.temperatures[index.min(last_temperature)];
            let humidity = request.humidities[index.min(last_humidity)];

            let features = LoadFeatures::new(cursor, previous_load, temperature, humidity);
            let load = self.model.predict(&features.to_array());

            loads.push(round1(load));
            previous_load = load;
        }

        debug!(
            horizon = request.horizon,
            start_hour = start.hour(),
            start_weekday = start.weekday(),
            initial_load_mw = request.initial_load_mw,
            "forecast computed"
        );
        Ok(LoadForecast::from_steps(loads))
    }
}

fn last_index(series: &[f64], name: &'static str) -> Result<usize, ForecastError> {
    series
        .len()
        .checked_sub(1)
        .ok_or(ForecastError::EmptyWeatherSeries { series: name })
}
