use axum::extract::{rejection::PathRejection, Path, State};

use crate::{
    api::{error::ApiError, response::ApiResponse},
    domain::clamp_horizon,
    service::{AppState, FleetReport},
};

/// GET /api/transformers/:horizon - Overload risk per transformer
pub async fn get_transformer_status(
    State(st): State<AppState>,
    horizon: Result<Path<i64>, PathRejection>,
) -> Result<ApiResponse<FleetReport>, ApiError> {
    let Path(horizon) = horizon?;
    let report = st.service.fleet_report(clamp_horizon(horizon)).await?;
    Ok(ApiResponse::success(report))
}
