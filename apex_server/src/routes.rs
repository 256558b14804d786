use crate::state::{AppState, HealthResponse};
use apex_metrics::{PrometheusExporter, CONTENT_TYPE};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the router until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Serving metrics on http://{}/metrics", addr);
    info!("Endpoints:");
    info!("  GET  /metrics  - Prometheus exposition");
    info!("  GET  /health   - Poller health");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    // Held across encoding so a scrape never sees a half-applied poll.
    let metrics = state.metrics.read().await;

    match PrometheusExporter::format(&metrics) {
        Ok(body) => {
            debug!("Served {} bytes of metrics", body.len());
            ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
        }
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics").into_response()
        }
    }
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let health = state.health.read().await;
    Json(HealthResponse::from_health(
        &health,
        state.start_time.elapsed().as_secs(),
    ))
}
