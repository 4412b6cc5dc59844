use contracts::dashboards::d402_operation_report::{ReportRequest, ReportResponse};
use gloo_net::http::Request;

const API_BASE: &str = "/api";

/// URL отчёта с параметрами; пустые фильтры в строку запроса не попадают
pub fn report_url(request: &ReportRequest) -> Result<String, String> {
    let query =
        serde_qs::to_string(request).map_err(|e| format!("Failed to build query: {}", e))?;
    Ok(format!("{}/report?{}", API_BASE, query))
}

/// GET /api/report?date=&platform=&account=&days=&page=&page_size=
pub async fn fetch_report(request: &ReportRequest) -> Result<ReportResponse, String> {
    let url = report_url(request)?;

    let response = Request::get(&url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP error: {}", response.status()));
    }

    let data: ReportResponse = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    Ok(data)
}
