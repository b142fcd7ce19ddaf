use crate::api::readings::readings::create_reading;
use crate::health;
use crate::state::ServerState;

use axum::{
    Router,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: ServerState, metrics_handle: PrometheusHandle) -> Router {
    Router::new()
        // Streaming endpoint
        .route("/ws/readings", get(sr_ws::handler))
        // Ingestion endpoint
        .route("/api/readings", post(create_reading))
        // Health check endpoints
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        // Prometheus scrape endpoint
        .route(
            "/metrics",
            get(move || std::future::ready(metrics_handle.render())),
        )
        // Add shared state
        .with_state(state)
        // CORS middleware (allow all origins; browsers consume the stream)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
