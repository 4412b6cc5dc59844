use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use contracts::dashboards::d402_operation_report::{ReportRequest, ReportResponse};
use std::sync::Arc;

use crate::dashboards::d402_operation_report::{service, ReportSource, UpstreamError};

pub type SharedReportSource = Arc<dyn ReportSource>;

/// GET /api/report?date=&platform=&account=&days=&page=&page_size=
/// Проксирует запрос в API отчёта
pub async fn get_report(
    State(source): State<SharedReportSource>,
    Query(request): Query<ReportRequest>,
) -> Result<Json<ReportResponse>, StatusCode> {
    tracing::info!(
        "D402 Operation report: date={}, platform={:?}, account={:?}, days={:?}, page={}",
        request.date,
        request.platform,
        request.account,
        request.days,
        request.page
    );

    match service::get_report(source.as_ref(), request).await {
        Ok(response) => {
            tracing::info!(
                "D402 Operation report: returning {} rows of {}",
                response.rows.len(),
                response.total
            );
            Ok(Json(response))
        }
        Err(e @ UpstreamError::Status { .. }) => {
            tracing::error!("D402 Operation report: upstream rejected request: {}", e);
            Err(StatusCode::BAD_GATEWAY)
        }
        Err(e) => {
            tracing::error!("D402 Operation report: failed to load report: {}", e);
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}
