use axum::{routing::get, Router};
use std::path::Path;
use tower_http::compression::CompressionLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::api::handlers;
use crate::api::handlers::d402_operation_report::SharedReportSource;

/// Конфигурация всех роутов приложения
///
/// Всё, что не /api, отдаётся из каталога статики; неизвестные пути
/// получают index.html (маршрутизация на клиенте). Ответы сжимаются,
/// если клиент прислал Accept-Encoding.
pub fn configure_routes(source: SharedReportSource, static_dir: &Path) -> Router {
    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/api/health", get(handlers::health::health))
        // D402 Operation report
        .route(
            "/api/report",
            get(handlers::d402_operation_report::get_report),
        )
        .with_state(source)
        .fallback_service(spa)
        .layer(CompressionLayer::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d402_operation_report::{ReportSource, UpstreamError};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use contracts::dashboards::d402_operation_report::{ReportRequest, ReportResponse};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    const INDEX_HTML: &str = "<!DOCTYPE html><html><body>d402</body></html>";

    struct OfflineSource;

    #[async_trait]
    impl ReportSource for OfflineSource {
        async fn fetch_report(
            &self,
            _request: &ReportRequest,
        ) -> Result<ReportResponse, UpstreamError> {
            Err(UpstreamError::Unreachable("offline".into()))
        }
    }

    fn static_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("d402-routes-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), INDEX_HTML).unwrap();
        std::fs::write(dir.join("app.js"), "console.log('d402');\n".repeat(200)).unwrap();
        dir
    }

    fn router(dir: &Path) -> Router {
        configure_routes(Arc::new(OfflineSource), dir)
    }

    #[tokio::test]
    async fn test_static_bundle_is_gzipped() {
        let dir = static_dir("gzip");
        let request = Request::builder()
            .uri("/app.js")
            .header(header::ACCEPT_ENCODING, "gzip")
            .body(Body::empty())
            .unwrap();

        let response = router(&dir).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_ENCODING).unwrap(), "gzip");
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_plain_request_is_not_compressed() {
        let dir = static_dir("plain");
        let request = Request::builder()
            .uri("/app.js")
            .body(Body::empty())
            .unwrap();

        let response = router(&dir).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_unknown_path_gets_index_html() {
        let dir = static_dir("spa");
        let request = Request::builder()
            .uri("/reports/123")
            .body(Body::empty())
            .unwrap();

        let response = router(&dir).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, INDEX_HTML.as_bytes());
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn test_health_is_routed() {
        let dir = static_dir("health");
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let response = router(&dir).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        std::fs::remove_dir_all(dir).ok();
    }
}
