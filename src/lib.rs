//! Short-horizon electrical demand forecasting for a city grid and its
//! distribution transformers.
//!
//! A pre-trained linear model is chained autoregressively: each hourly step
//! takes the previous step's predicted load as an input feature.

pub mod api;
pub mod config;
pub mod domain;
pub mod forecast;
pub mod ml;
pub mod service;
pub mod telemetry;
