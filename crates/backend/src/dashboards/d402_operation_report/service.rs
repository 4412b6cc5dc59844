use async_trait::async_trait;
use contracts::dashboards::d402_operation_report::{ReportRequest, ReportResponse};
use thiserror::Error;

use crate::shared::config::UpstreamConfig;

/// Ошибки обращения к API отчёта
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream unreachable: {0}")]
    Unreachable(String),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode upstream response: {0}")]
    Decode(String),
}

/// Источник данных отчёта
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch_report(&self, request: &ReportRequest) -> Result<ReportResponse, UpstreamError>;
}

/// HTTP-клиент API отчёта: GET {base_url}/api/report
pub struct UpstreamClient {
    client: reqwest::Client,
    report_url: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            report_url: report_url(&config.base_url),
        })
    }
}

#[async_trait]
impl ReportSource for UpstreamClient {
    async fn fetch_report(&self, request: &ReportRequest) -> Result<ReportResponse, UpstreamError> {
        let response = self
            .client
            .get(&self.report_url)
            .query(request)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| UpstreamError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| UpstreamError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        decode_report(&body)
    }
}

pub fn report_url(base_url: &str) -> String {
    format!("{}/api/report", base_url.trim_end_matches('/'))
}

pub fn decode_report(body: &str) -> Result<ReportResponse, UpstreamError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::debug!("Undecodable report body: {}", preview(body));
        UpstreamError::Decode(e.to_string())
    })
}

/// Первые 500 символов тела для логов
fn preview(body: &str) -> String {
    let preview: String = body.chars().take(500).collect();
    if preview.len() < body.len() {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// Запрашивает страницу отчёта; пустые platform/account означают "все"
pub async fn get_report(
    source: &dyn ReportSource,
    request: ReportRequest,
) -> Result<ReportResponse, UpstreamError> {
    let request = request.normalized();
    source.fetch_report(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSource {
        seen: Mutex<Vec<ReportRequest>>,
    }

    #[async_trait]
    impl ReportSource for RecordingSource {
        async fn fetch_report(
            &self,
            request: &ReportRequest,
        ) -> Result<ReportResponse, UpstreamError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(ReportResponse {
                start: request.date,
                end: request.date,
                days_count: 1,
                page: request.page,
                page_size: request.page_size,
                total: 0,
                rows: Vec::new(),
            })
        }
    }

    fn request() -> ReportRequest {
        ReportRequest {
            date: NaiveDate::from_ymd_opt(2024, 5, 12).unwrap(),
            platform: Some(" ".to_string()),
            account: Some("shop-1".to_string()),
            days: Some(7),
            page: 2,
            page_size: 20,
        }
    }

    #[test]
    fn test_report_url() {
        assert_eq!(
            report_url("http://localhost:8009"),
            "http://localhost:8009/api/report"
        );
        assert_eq!(
            report_url("http://localhost:8009/"),
            "http://localhost:8009/api/report"
        );
    }

    #[test]
    fn test_decode_report() {
        let body = r#"{
            "start": "2024-05-01", "end": "2024-05-12", "days_count": 12,
            "page": 1, "page_size": 20, "total": 0, "rows": []
        }"#;
        let response = decode_report(body).unwrap();
        assert_eq!(response.days_count, 12);
        assert!(response.rows.is_empty());

        assert!(matches!(
            decode_report("<html>502</html>"),
            Err(UpstreamError::Decode(_))
        ));
    }

    #[test]
    fn test_preview_truncates() {
        let body = "x".repeat(600);
        let p = preview(&body);
        assert_eq!(p.len(), 503);
        assert!(p.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }

    #[tokio::test]
    async fn test_get_report_normalizes_filters() {
        let source = RecordingSource::default();
        let response = get_report(&source, request()).await.unwrap();
        assert_eq!(response.page, 2);

        let seen = source.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].platform, None);
        assert_eq!(seen[0].account.as_deref(), Some("shop-1"));
        assert_eq!(seen[0].days, Some(7));
    }
}
