use super::dto::{MetricsReport, MetricsRequest};
use super::service::MetricsService;
use crate::common::error::{AppError, AppResult};
use crate::common::response::{ApiSuccess, ErrorBody};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

/// Compute PSNR/SSIM/VMAF and file size of a converted video
#[utoipa::path(
    post,
    path = "/metrics",
    request_body = MetricsRequest,
    responses(
        (status = 200, description = "Quality report", body = MetricsReport),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 500, description = "Metrics tool or size probe failed", body = ErrorBody)
    ),
    tag = "Metrics"
)]
pub async fn compute_metrics(
    State(state): State<AppState>,
    payload: Result<Json<MetricsRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(req) = payload.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    req.validate()?;

    let report = MetricsService::compute_metrics(&state, req).await?;
    Ok(ApiSuccess(report, StatusCode::OK))
}
