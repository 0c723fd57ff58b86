//! Grid forecasting service shared by the HTTP handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local};
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{Config, ForecastConfig};
use crate::domain::{round1, GeoLocation, LoadForecast, Transformer};
use crate::forecast::{
    aggregate, classify, ForecastError, ForecastRequest, LoadForecaster, OpenWeatherClient,
    ResilientWeather, RiskTier, SyntheticWeather, TimeCursor, WeatherProvider, WeatherSeries,
};
use crate::ml::LinearLoadModel;

/// Source of the forecast anchor time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Always returns the same instant.
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// System-wide forecast for the city reference point.
#[derive(Debug, Clone, Serialize)]
pub struct SystemForecast {
    pub horizon: u32,
    /// Local time the step-1 calendar features were taken from
    #[serde(rename = "anchored_at")]
    pub generated_at: DateTime<FixedOffset>,
    pub weather: WeatherSeries,
    pub forecast: LoadForecast,
    pub peak_alert: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransformerStatus {
    pub name: String,
    pub location: String,
    pub capacity: f64,
    pub current_load: f64,
    pub transformer_peak: f64,
    pub first_hour_temp: f64,
    pub overload_pct: f64,
    pub risk: RiskTier,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetReport {
    pub horizon: u32,
    pub overall_risk: RiskTier,
    pub transformers: Vec<TransformerStatus>,
}

pub struct GridForecastService {
    forecaster: LoadForecaster,
    weather: ResilientWeather,
    clock: Arc<dyn Clock>,
    settings: ForecastConfig,
    city: GeoLocation,
    transformers: Vec<Transformer>,
}

impl GridForecastService {
    pub fn new(
        forecaster: LoadForecaster,
        weather: ResilientWeather,
        clock: Arc<dyn Clock>,
        settings: ForecastConfig,
        city: GeoLocation,
        transformers: Vec<Transformer>,
    ) -> Self {
        Self {
            forecaster,
            weather,
            clock,
            settings,
            city,
            transformers,
        }
    }

    pub fn settings(&self) -> &ForecastConfig {
        &self.settings
    }

    pub fn transformers(&self) -> &[Transformer] {
        &self.transformers
    }

    pub fn forecaster(&self) -> &LoadForecaster {
        &self.forecaster
    }

    fn run(
        &self,
        horizon: u32,
        weather: &WeatherSeries,
        initial_load_mw: f64,
        start: TimeCursor,
    ) -> Result<LoadForecast, ForecastError> {
        self.forecaster.forecast(
            &ForecastRequest {
                horizon,
                temperatures: &weather.temperatures_c,
                humidities: &weather.humidities_percent,
                initial_load_mw,
            },
            start,
        )
    }

    /// City-wide forecast seeded with the configured system load.
    /// `horizon` must already be bounded to 1..=24.
    pub async fn system_forecast(&self, horizon: u32) -> Result<SystemForecast, ForecastError> {
        let generated_at = self.clock.now();
        let weather = self.weather.outlook(&self.city, horizon).await;
        let forecast = self.run(
            horizon,
            &weather,
            self.settings.system_initial_load_mw,
            TimeCursor::from_datetime(&generated_at),
        )?;
        let peak_alert = forecast.peak_exceeds(self.settings.peak_alert_threshold_mw);

        if peak_alert {
            warn!(
                horizon,
                peak_mw = forecast.peak(),
                threshold_mw = self.settings.peak_alert_threshold_mw,
                "forecast peak above alert threshold"
            );
        } else {
            info!(horizon, peak_mw = forecast.peak(), "system forecast");
        }

        Ok(SystemForecast {
            horizon,
            generated_at,
            weather,
            forecast,
            peak_alert,
        })
    }

    /// Per-transformer forecasts with location-specific weather, each seeded
    /// with the transformer's current load.
    pub async fn fleet_report(&self, horizon: u32) -> Result<FleetReport, ForecastError> {
        let start = TimeCursor::from_datetime(&self.clock.now());
        let outlooks = join_all(
            self.transformers
                .iter()
                .map(|t| self.weather.outlook(&t.location, horizon)),
        )
        .await;

        let mut transformers = Vec::with_capacity(self.transformers.len());
        for (transformer, weather) in self.transformers.iter().zip(outlooks) {
            let forecast = self.run(horizon, &weather, transformer.current_load_mw, start)?;
            let peak = forecast.peak().unwrap_or(transformer.current_load_mw);
            let assessment = classify(peak, transformer.capacity_mw);

            info!(
                transformer = %transformer.name,
                peak_mw = peak,
                overload_pct = assessment.overload_percent,
                risk = %assessment.risk,
                "transformer assessed"
            );

            transformers.push(TransformerStatus {
                name: transformer.name.clone(),
                location: transformer.location.label(),
                capacity: transformer.capacity_mw,
                current_load: transformer.current_load_mw,
                transformer_peak: round1(peak),
                first_hour_temp: round1(weather.first_temperature().unwrap_or_default()),
                overload_pct: round1(assessment.overload_percent),
                risk: assessment.risk,
                recommendations: assessment.recommendations,
            });
        }

        let overall_risk = aggregate(transformers.iter().map(|s| s.risk));
        Ok(FleetReport {
            horizon,
            overall_risk,
            transformers,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub service: Arc<GridForecastService>,
}

impl AppState {
    /// Wire the service from configuration. Fails when the model cannot be
    /// loaded.
    pub fn new(cfg: Config) -> Result<Self> {
        let model = LinearLoadModel::load(&cfg.model.path).with_context(|| {
            format!("failed to load demand model from {}", cfg.model.path.display())
        })?;
        let fallback = SyntheticWeather::new(cfg.weather.reference);

        let client = OpenWeatherClient::new(
            cfg.weather.base_url.clone(),
            cfg.weather.api_key.clone(),
            cfg.weather.timeout(),
        )
        .context("failed to build weather client")?;
        let primary: Option<Box<dyn WeatherProvider>> = if client.has_api_key() {
            Some(Box::new(client))
        } else {
            warn!("OPENWEATHER_API_KEY not set; using synthetic weather");
            None
        };

        Ok(Self::with_parts(
            cfg,
            Arc::new(model),
            ResilientWeather::new(primary, fallback),
            Arc::new(SystemClock),
        ))
    }

    pub fn with_parts(
        cfg: Config,
        model: Arc<LinearLoadModel>,
        weather: ResilientWeather,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let service = GridForecastService::new(
            LoadForecaster::new(model),
            weather,
            clock,
            cfg.forecast.clone(),
            cfg.weather.reference,
            cfg.transformers.clone(),
        );
        Self {
            cfg: Arc::new(cfg),
            service: Arc::new(service),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ModelConfig, ServerConfig, WeatherConfig};
    use crate::forecast::WeatherSource;
    use crate::ml::{AffineScaler, ModelRecord};
    use chrono::TimeZone;

    const CITY: GeoLocation = GeoLocation {
        latitude: 19.0760,
        longitude: 72.8777,
    };

    fn config(transformers: Vec<Transformer>) -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                request_timeout_secs: 30,
                enable_cors: false,
            },
            model: ModelConfig {
                path: "unused.json".into(),
            },
            weather: WeatherConfig {
                base_url: "http://127.0.0.1:9".into(),
                api_key: None,
                http_timeout_seconds: 1,
                reference: CITY,
            },
            forecast: ForecastConfig {
                default_horizon_hours: 3,
                system_initial_load_mw: 2800.0,
                peak_alert_threshold_mw: 3500.0,
            },
            transformers,
        }
    }

    fn model(weights: [f64; 6], bias: f64) -> Arc<LinearLoadModel> {
        Arc::new(
            LinearLoadModel::from_record(ModelRecord {
                input_scaler: AffineScaler::identity(6),
                weights: weights.to_vec(),
                bias,
                output_scaler: AffineScaler::identity(1),
            })
            .unwrap(),
        )
    }

    fn state(cfg: Config, weights: [f64; 6], bias: f64) -> AppState {
        let clock = FixedClock(
            FixedOffset::east_opt(19800)
                .unwrap()
                .with_ymd_and_hms(2024, 6, 9, 23, 0, 0)
                .unwrap(),
        );
        AppState::with_parts(
            cfg,
            model(weights, bias),
            ResilientWeather::synthetic_only(SyntheticWeather::new(CITY)),
            Arc::new(clock),
        )
    }

    #[tokio::test]
    async fn test_system_forecast_passthrough() {
        let st = state(config(vec![]), [0.0, 0.0, 0.0, 1.0, 0.0, 0.0], 0.0);
        let out = st.service.system_forecast(4).await.unwrap();

        assert_eq!(out.horizon, 4);
        assert_eq!(out.forecast.values(), &[2800.0; 4]);
        assert!(!out.peak_alert);
        assert_eq!(out.weather.source, WeatherSource::Synthetic);
        assert_eq!(out.weather.temperatures_c.len(), 4);
    }

    #[tokio::test]
    async fn test_system_forecast_peak_alert() {
        // Each step adds 400 MW: 3200, 3600
        let st = state(config(vec![]), [0.0, 0.0, 0.0, 1.0, 0.0, 0.0], 400.0);
        let out = st.service.system_forecast(2).await.unwrap();
        assert_eq!(out.forecast.values(), &[3200.0, 3600.0]);
        assert!(out.peak_alert);
    }

    #[tokio::test]
    async fn test_system_forecast_uses_clock_anchor() {
        // Load = weekday * 1000 + hour; clock is Sunday 23:00
        let st = state(config(vec![]), [1.0, 1000.0, 0.0, 0.0, 0.0, 0.0], 0.0);
        let out = st.service.system_forecast(2).await.unwrap();
        assert_eq!(out.forecast.values(), &[6023.0, 0.0]);
    }

    #[tokio::test]
    async fn test_fleet_report_overall_risk() {
        let fleet = vec![
            Transformer::new("T1-Bandra", 2500.0, 2100.0, GeoLocation::new(19.0671, 72.8657)),
            Transformer::new("T2-Dadar", 1800.0, 1650.0, GeoLocation::new(19.0190, 72.8420)),
            Transformer::new("T3-Hot", 1000.0, 1300.0, GeoLocation::new(19.1137, 72.8632)),
            Transformer::new("T4-Kurla", 2000.0, 1750.0, GeoLocation::new(19.0760, 72.8774)),
        ];
        let st = state(config(fleet), [0.0, 0.0, 0.0, 1.0, 0.0, 0.0], 0.0);
        let report = st.service.fleet_report(3).await.unwrap();

        assert_eq!(report.overall_risk, RiskTier::High);
        assert_eq!(report.transformers.len(), 4);

        let hot = &report.transformers[2];
        assert_eq!(hot.transformer_peak, 1300.0);
        assert_eq!(hot.overload_pct, 30.0);
        assert_eq!(hot.risk, RiskTier::High);
        assert_eq!(hot.recommendations.len(), 4);

        let bandra = &report.transformers[0];
        assert_eq!(bandra.location, "19.0671°N 72.8657°E");
        assert_eq!(bandra.overload_pct, 0.0);
        assert_eq!(bandra.risk, RiskTier::Low);
        assert_eq!(bandra.first_hour_temp, round1(34.5 - (19.0671 - 19.0760_f64).abs() * 0.8));
    }

    #[tokio::test]
    async fn test_fleet_report_empty_fleet_is_low() {
        let st = state(config(vec![]), [0.0; 6], 0.0);
        let report = st.service.fleet_report(1).await.unwrap();
        assert_eq!(report.overall_risk, RiskTier::Low);
        assert!(report.transformers.is_empty());
    }
}
