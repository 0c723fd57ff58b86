#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{FixedOffset, TimeZone};
use grid_load_forecaster::config::{
    Config, ForecastConfig, ModelConfig, ServerConfig, WeatherConfig,
};
use grid_load_forecaster::domain::{GeoLocation, Transformer};
use grid_load_forecaster::forecast::{ResilientWeather, SyntheticWeather};
use grid_load_forecaster::ml::LinearLoadModel;
use grid_load_forecaster::service::{AppState, FixedClock};

pub const CITY: GeoLocation = GeoLocation {
    latitude: 19.0760,
    longitude: 72.8777,
};

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn mumbai_fleet() -> Vec<Transformer> {
    vec![
        Transformer::new("T1-Bandra", 2500.0, 2100.0, GeoLocation::new(19.0671, 72.8657)),
        Transformer::new("T2-Dadar", 1800.0, 1650.0, GeoLocation::new(19.0190, 72.8420)),
        Transformer::new("T3-Andheri", 2200.0, 1950.0, GeoLocation::new(19.1137, 72.8632)),
        Transformer::new("T4-Kurla", 2000.0, 1750.0, GeoLocation::new(19.0760, 72.8774)),
    ]
}

pub fn test_config(model: &str, transformers: Vec<Transformer>) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            request_timeout_secs: 30,
            enable_cors: false,
        },
        model: ModelConfig {
            path: fixture(model),
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

/// Passthrough model, synthetic weather, clock pinned to a Wednesday noon.
pub fn test_state(transformers: Vec<Transformer>) -> AppState {
    let cfg = test_config("passthrough_model.json", transformers);
    let model = LinearLoadModel::load(&cfg.model.path).unwrap();
    let clock = FixedClock(
        FixedOffset::east_opt(19800)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 12, 12, 0, 0)
            .unwrap(),
    );
    AppState::with_parts(
        cfg,
        Arc::new(model),
        ResilientWeather::synthetic_only(SyntheticWeather::new(CITY)),
        Arc::new(clock),
    )
}
