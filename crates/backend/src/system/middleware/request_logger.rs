use axum::body::to_bytes;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;
use std::time::Duration;

/// Middleware для логирования HTTP запросов
///
/// Выводит в консоль строку вида
/// `12:30:01 |    12ms |        1.234 | 200    GET /api/report`
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Читаем тело ответа, чтобы узнать реальный размер
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("{} {}: failed to read response body: {}", method, path, e);
            println!(
                "{}",
                log_line(start.elapsed(), None, parts.status, &method, &path)
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    println!(
        "{}",
        log_line(
            start.elapsed(),
            Some(bytes.len()),
            parts.status,
            &method,
            &path
        )
    );

    Response::from_parts(parts, Body::from(bytes))
}

/// Время голубым для 200, коричневым для остального
fn log_line(
    duration: Duration,
    size: Option<usize>,
    status: StatusCode,
    method: &Method,
    path: &str,
) -> String {
    let color_code = if status == StatusCode::OK { "36" } else { "33" };
    let size = size.map(format_size).unwrap_or_else(|| "error".to_string());

    format!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        color_code,
        Local::now().format("%H:%M:%S"),
        duration.as_millis(),
        size,
        status.as_u16(),
        method.as_str(),
        path
    )
}

/// Размер с разделителями тысяч (точками): 1234567 -> "1.234.567"
fn format_size(n: usize) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result
}
