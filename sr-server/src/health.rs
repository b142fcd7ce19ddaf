use crate::state::ServerState;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// GET /health - health check with component status
pub async fn health(State(state): State<ServerState>) -> Response {
    let db_online = state.ws.db_status.is_online();

    let body = json!({
        "status": if db_online { "healthy" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "components": {
            "database": if db_online { "online" } else { "offline" },
            "websocket": "operational",
        },
        "subscribers": state.ws.registry.total_count().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(body)).into_response()
}

/// GET /live - liveness probe (is the process alive?)
pub async fn liveness() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready - readiness probe.
///
/// The server stays ready when the database is offline; ingestion and
/// broadcast keep working without it.
pub async fn readiness() -> Response {
    (StatusCode::OK, "Ready").into_response()
}
