use std::time::Duration;
use axum::{
    routing::get,
    Router,
    response::IntoResponse,
    http::{header, Uri, StatusCode},
    body::Body,
};
use rust_embed::RustEmbed;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use crate::config::ServerConfig;
use crate::dashboard::api;
use crate::QueueBrowserEngine;

// Embed the frontend build directory
#[derive(RustEmbed)]
#[folder = "dashboard/dist/"]
struct Assets;

pub fn router(engine: QueueBrowserEngine, request_timeout: Duration) -> Router {
    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/queues", get(api::list_queues))
        .route("/api/queues/{queue}", get(api::list_messages))
        .route("/api/queues/{queue}/{message_id}", get(api::show_message))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CompressionLayer::new())
        .fallback(static_handler)
        .with_state(engine)
}

pub async fn start_dashboard_server(engine: QueueBrowserEngine, config: &ServerConfig) -> std::io::Result<()> {
    let app = router(engine, config.request_timeout());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🌐 Queue browser available at http://{}", addr);

    axum::serve(listener, app).await
}

// Handler for serving embedded static files (SPA support)
async fn static_handler(uri: Uri) -> impl IntoResponse {
    let mut path = uri.path().trim_start_matches('/').to_string();

    if path.is_empty() {
        path = "index.html".to_string();
    }

    match Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], Body::from(content.data)).into_response()
        }
        None => {
            // Unknown API paths are real 404s, not the SPA shell
            if path.starts_with("api/") {
                return (StatusCode::NOT_FOUND, "Not found").into_response();
            }
            match Assets::get("index.html") {
                Some(content) => {
                    let mime = mime_guess::from_path("index.html").first_or_octet_stream();
                    ([(header::CONTENT_TYPE, mime.as_ref())], Body::from(content.data)).into_response()
                }
                None => (StatusCode::NOT_FOUND, "Dashboard not found (index.html missing)").into_response()
            }
        }
    }
}
