use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Standard success envelope. The payload's fields are inlined next to
/// `success` and `timestamp`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always true; failures are rendered by `ApiError`
    pub success: bool,
    /// Response timestamp
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            timestamp: Utc::now(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
