use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::modules::UpstreamConfig;
use crate::proxy::routes;
use crate::proxy::upstream::UpstreamClient;

/// Axum application state.
///
/// Everything in here is immutable after startup: the resolved upstream base
/// URL and the pooled HTTP client. Requests share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<UpstreamConfig>,
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    pub fn new(config: UpstreamConfig, upstream: UpstreamClient) -> Self {
        Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
        }
    }
}

/// Build the application router: forwarded routes, health check, middleware.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .route("/healthz", get(health_check_handler))
        .layer(DefaultBodyLimit::max(100 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(
            crate::proxy::middleware::session_middleware,
        ))
        .with_state(state)
}

/// Serve the application until the shutdown future resolves.
pub async fn serve(
    listener: tokio::net::TcpListener,
    state: AppState,
) -> Result<(), std::io::Error> {
    let app = build_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install shutdown handler: {e}");
    }
}

/// Health check handler, answered locally without an upstream call.
async fn health_check_handler() -> Response {
    Json(serde_json::json!({
        "status": "ok"
    }))
    .into_response()
}
