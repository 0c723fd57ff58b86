use axum::{extract::State, Json};
use serde::Serialize;

use crate::service::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: chrono::DateTime<chrono::Utc>,
    model_features: usize,
    transformers: usize,
}

/// GET /healthz - Liveness plus a summary of what is being served
///
/// The model is validated at startup, so a running process is healthy.
pub async fn healthz(State(st): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now(),
        model_features: st.service.forecaster().model().feature_count(),
        transformers: st.service.transformers().len(),
    })
}
