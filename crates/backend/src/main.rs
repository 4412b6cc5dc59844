pub mod api;
pub mod dashboards;
pub mod routes;
pub mod shared;
pub mod system;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};

    use crate::api::handlers::d402_operation_report::SharedReportSource;
    use crate::dashboards::d402_operation_report::UpstreamClient;
    use crate::system::middleware::request_logger;

    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    tracing::info!("Upstream report API: {}", config.upstream.base_url);

    let source: SharedReportSource = Arc::new(UpstreamClient::new(&config.upstream)?);

    let static_dir = config.static_dir_path();
    if !static_dir.join("index.html").exists() {
        tracing::warn!(
            "index.html not found in {}; run `trunk build` first",
            static_dir.display()
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes(source, &static_dir)
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let port = config.server.port;
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Set PORT or server.port to another value.",
                    port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
