use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
};
use serde::Deserialize;

use crate::{
    api::{error::ApiError, response::ApiResponse},
    domain::clamp_horizon,
    service::{AppState, SystemForecast},
};

#[derive(Debug, Default, Deserialize)]
pub struct ForecastBody {
    pub horizon: Option<i64>,
}

/// POST /api/forecast - City-wide load forecast
///
/// The body is optional; a missing horizon falls back to the configured
/// default. Horizons are clamped to 1..=24.
pub async fn post_forecast(
    State(st): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<ApiResponse<SystemForecast>, ApiError> {
    let body = body?;
    let body: ForecastBody = if body.iter().all(u8::is_ascii_whitespace) {
        ForecastBody::default()
    } else {
        serde_json::from_slice(&body)?
    };

    let horizon = clamp_horizon(
        body.horizon
            .unwrap_or_else(|| i64::from(st.service.settings().default_horizon_hours)),
    );
    let forecast = st.service.system_forecast(horizon).await?;
    Ok(ApiResponse::success(forecast))
}
