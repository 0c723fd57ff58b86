use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use validator::Validate;

use crate::domain::{GeoLocation, Transformer};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    pub server: ServerConfig,
    pub model: ModelConfig,
    #[validate(nested)]
    pub weather: WeatherConfig,
    #[validate(nested)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    #[validate(nested)]
    pub transformers: Vec<Transformer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub enable_cors: bool,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WeatherConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_weather_timeout_secs")]
    pub http_timeout_seconds: u64,
    /// City reference point; also the location of the system-wide forecast
    #[validate(nested)]
    pub reference: GeoLocation,
}

fn default_weather_timeout_secs() -> u64 {
    5
}

impl WeatherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds.max(1))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForecastConfig {
    #[validate(range(min = 1, max = 24))]
    pub default_horizon_hours: u32,
    /// Seed load for the system-wide forecast (MW)
    #[validate(range(min = 0.0))]
    pub system_initial_load_mw: f64,
    /// Peak alert fires when any step is strictly above this (MW)
    #[validate(range(exclusive_min = 0.0))]
    pub peak_alert_threshold_mw: f64,
}

impl Config {
    /// Defaults from `config/default.toml`, overridden by `GLF__`-prefixed
    /// environment variables (`GLF__SERVER__PORT=8080`). `OPENWEATHER_API_KEY`
    /// is honoured for the weather key.
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let figment = Figment::new()
            .merge(Toml::file(&path))
            .merge(
                Env::raw()
                    .only(&["OPENWEATHER_API_KEY"])
                    .map(|_| "weather.api_key".into()),
            )
            .merge(Env::prefixed("GLF__").split("__"));
        Self::from_figment(figment)
            .with_context(|| format!("invalid configuration (defaults from {})", path.display()))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    const SAMPLE: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 5001

        [model]
        path = "models/demand_load_model.json"

        [weather]
        base_url = "https://api.openweathermap.org"
        reference = { latitude = 19.0760, longitude = 72.8777 }

        [forecast]
        default_horizon_hours = 3
        system_initial_load_mw = 2800.0
        peak_alert_threshold_mw = 3500.0

        [[transformers]]
        name = "T1-Bandra"
        capacity_mw = 2500.0
        current_load_mw = 2100.0
        latitude = 19.0671
        longitude = 72.8657
    "#;

    #[test]
    fn test_load_file_with_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file("glf.toml", SAMPLE)?;
            let cfg = Config::load_from("glf.toml").map_err(|e| e.to_string())?;

            assert_eq!(cfg.server.port, 5001);
            assert_eq!(cfg.server.request_timeout_secs, 30);
            assert!(!cfg.server.enable_cors);
            assert_eq!(cfg.weather.http_timeout_seconds, 5);
            assert_eq!(cfg.forecast.default_horizon_hours, 3);
            assert_eq!(cfg.transformers.len(), 1);
            assert_eq!(cfg.transformers[0].location, GeoLocation::new(19.0671, 72.8657));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file("glf.toml", SAMPLE)?;
            jail.set_env("GLF__SERVER__PORT", "8080");
            jail.set_env("GLF__FORECAST__PEAK_ALERT_THRESHOLD_MW", "4000");
            jail.set_env("OPENWEATHER_API_KEY", "abc123");

            let cfg = Config::load_from("glf.toml").map_err(|e| e.to_string())?;
            assert_eq!(cfg.server.port, 8080);
            assert_eq!(cfg.forecast.peak_alert_threshold_mw, 4000.0);
            assert_eq!(cfg.weather.api_key.as_deref(), Some("abc123"));
            Ok(())
        });
    }

    #[test]
    fn test_rejects_out_of_range_default_horizon() {
        Jail::expect_with(|jail| {
            jail.create_file("glf.toml", SAMPLE)?;
            jail.set_env("GLF__FORECAST__DEFAULT_HORIZON_HOURS", "48");
            assert!(Config::load_from("glf.toml").is_err());
            Ok(())
        });
    }

    #[test]
    fn test_rejects_zero_capacity_transformer() {
        Jail::expect_with(|jail| {
            jail.create_file("glf.toml", &SAMPLE.replace("capacity_mw = 2500.0", "capacity_mw = 0.0"))?;
            assert!(Config::load_from("glf.toml").is_err());
            Ok(())
        });
    }

    #[test]
    fn test_socket_addr() {
        let server = ServerConfig {
            host: "0.0.0.0".into(),
            port: 5001,
            request_timeout_secs: 30,
            enable_cors: false,
        };
        assert_eq!(server.socket_addr().unwrap().port(), 5001);
    }
}
