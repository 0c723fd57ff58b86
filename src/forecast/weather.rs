//! Weather outlook for load forecasting (OpenWeather)
//!
//! Live hourly outlooks come from the OpenWeather forecast API. When the
//! API is unavailable or unconfigured, a deterministic synthetic outlook
//! derived from the location's offset to the city reference point is used
//! instead, so a forecast request never fails on weather.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::GeoLocation;

/// Where a weather series came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherSource {
    Live,
    Synthetic,
}

/// Per-step weather values for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSeries {
    #[serde(rename = "temps")]
    pub temperatures_c: Vec<f64>,
    #[serde(rename = "hums")]
    pub humidities_percent: Vec<f64>,
    pub source: WeatherSource,
}

impl WeatherSeries {
    pub fn first_temperature(&self) -> Option<f64> {
        self.temperatures_c.first().copied()
    }
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("weather API key is not configured")]
    MissingApiKey,

    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("weather API returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("weather API returned no forecast points")]
    Empty,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Hourly outlook for the next `horizon` steps. The series may be
    /// shorter than `horizon`.
    async fn outlook(
        &self,
        location: &GeoLocation,
        horizon: u32,
    ) -> Result<WeatherSeries, WeatherError>;
}

/// OpenWeather 2.5 forecast API client
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn outlook(
        &self,
        location: &GeoLocation,
        horizon: u32,
    ) -> Result<WeatherSeries, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let url = format!("{}/data/2.5/forecast", self.base_url.trim_end_matches('/'));

        debug!(
            latitude = location.latitude,
            longitude = location.longitude,
            horizon,
            "fetching weather outlook"
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", location.latitude.to_string()),
                ("lon", location.longitude.to_string()),
                ("cnt", horizon.to_string()),
                ("appid", api_key.to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status));
        }

        let body: OpenWeatherResponse = response.json().await?;
        if body.list.is_empty() {
            return Err(WeatherError::Empty);
        }

        let (temperatures_c, humidities_percent) = body
            .list
            .into_iter()
            .map(|entry| (entry.main.temp, entry.main.humidity))
            .unzip();

        info!(
            location = %location.label(),
            horizon,
            "weather outlook loaded"
        );

        Ok(WeatherSeries {
            temperatures_c,
            humidities_percent,
            source: WeatherSource::Live,
        })
    }
}

// OpenWeather API response structures
#[derive(Debug, Deserialize)]
struct OpenWeatherResponse {
    list: Vec<OpenWeatherEntry>,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherEntry {
    main: OpenWeatherMain,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherMain {
    temp: f64,
    humidity: f64,
}

/// Deterministic demo outlook. Locations further from the reference point
/// are slightly cooler and more humid.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticWeather {
    reference: GeoLocation,
}

const BASE_TEMPERATURE_C: f64 = 34.5;
const TEMPERATURE_DROP_PER_DEGREE: f64 = 0.8;
const TEMPERATURE_SPAN_C: f64 = 1.5;
const BASE_HUMIDITY_PERCENT: f64 = 75.0;
const HUMIDITY_RISE_PER_DEGREE: f64 = 2.0;
const FINAL_HUMIDITY_PERCENT: f64 = 82.0;

impl SyntheticWeather {
    pub fn new(reference: GeoLocation) -> Self {
        Self { reference }
    }

    pub fn series(&self, location: &GeoLocation, horizon: u32) -> WeatherSeries {
        let base_temp = BASE_TEMPERATURE_C
            - (location.latitude - self.reference.latitude).abs() * TEMPERATURE_DROP_PER_DEGREE;
        let base_humidity = BASE_HUMIDITY_PERCENT
            + (location.longitude - self.reference.longitude).abs() * HUMIDITY_RISE_PER_DEGREE;

        WeatherSeries {
            temperatures_c: linspace(base_temp, base_temp - TEMPERATURE_SPAN_C, horizon as usize),
            humidities_percent: linspace(base_humidity, FINAL_HUMIDITY_PERCENT, horizon as usize),
            source: WeatherSource::Synthetic,
        }
    }
}

#[async_trait]
impl WeatherProvider for SyntheticWeather {
    async fn outlook(
        &self,
        location: &GeoLocation,
        horizon: u32,
    ) -> Result<WeatherSeries, WeatherError> {
        Ok(self.series(location, horizon))
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Live provider with a synthetic fallback. Never fails.
pub struct ResilientWeather {
    primary: Option<Box<dyn WeatherProvider>>,
    fallback: SyntheticWeather,
}

impl ResilientWeather {
    pub fn new(primary: Option<Box<dyn WeatherProvider>>, fallback: SyntheticWeather) -> Self {
        Self { primary, fallback }
    }

    pub fn synthetic_only(fallback: SyntheticWeather) -> Self {
        Self::new(None, fallback)
    }

    pub async fn outlook(&self, location: &GeoLocation, horizon: u32) -> WeatherSeries {
        if let Some(primary) = &self.primary {
            match primary.outlook(location, horizon).await {
                Ok(series)
                    if !series.temperatures_c.is_empty() && !series.humidities_percent.is_empty() =>
                {
                    return series;
                }
                Ok(_) => warn!(
                    location = %location.label(),
                    "weather outlook incomplete, using synthetic data"
                ),
                Err(e) => warn!(
                    location = %location.label(),
                    error = %e,
                    "weather outlook unavailable, using synthetic data"
                ),
            }
        }
        debug!(location = %location.label(), horizon, "synthetic weather outlook");
        self.fallback.series(location, horizon)
    }
}
