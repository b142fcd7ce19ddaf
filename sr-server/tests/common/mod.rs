#![allow(dead_code)]

use sr_auth::ApiKeyValidator;
use sr_db::{DbStatus, MIGRATOR, ReadingRepository};
use sr_server::ServerState;
use sr_server::{create_reading, health};
use sr_ws::{
    AppState, BroadcastDispatcher, ConnectionConfig, ConnectionLimits, ConnectionRegistry, Metrics,
    ShutdownCoordinator,
};

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use axum_test::TestServer;
use sqlx::sqlite::SqlitePoolOptions;

pub const TEST_API_KEY: &str = "test-ingest-api-key";
pub const TEST_WS_API_KEY: &str = "test-ws-api-key";

pub struct TestServerWithState {
    pub server: TestServer,
    pub state: ServerState,
}

pub async fn create_test_server() -> TestServerWithState {
    create_test_server_with_keys(Some(TEST_API_KEY.to_string()), Some(TEST_WS_API_KEY.to_string()))
        .await
}

/// Build a test server around an in-memory database.
///
/// The router is assembled here rather than through `build_router` because
/// the Prometheus recorder is a process-wide global that cannot be installed
/// once per test.
pub async fn create_test_server_with_keys(
    api_key: Option<String>,
    ws_api_key: Option<String>,
) -> TestServerWithState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    MIGRATOR.run(&pool).await.expect("migrations");

    let metrics = Metrics::new();
    let registry = ConnectionRegistry::new(ConnectionLimits::unlimited(), metrics.clone());
    let connection_config = ConnectionConfig {
        send_buffer_size: 16,
        send_timeout_ms: 500,
    };
    let dispatcher =
        BroadcastDispatcher::new(registry.clone(), connection_config, metrics.clone());

    let app_state = AppState {
        validator: Arc::new(ApiKeyValidator::new(ws_api_key, "streaming")),
        registry,
        repository: ReadingRepository::new(pool),
        db_status: DbStatus::new(true),
        metrics,
        shutdown: ShutdownCoordinator::new(),
        config: connection_config,
    };

    let state = ServerState {
        ws: app_state,
        ingest_validator: Arc::new(ApiKeyValidator::new(api_key, "ingestion")),
        dispatcher,
    };

    let app = Router::new()
        .route("/ws/readings", get(sr_ws::handler))
        .route("/api/readings", post(create_reading))
        .route("/health", get(health::health))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness))
        .with_state(state.clone());

    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState { server, state }
}

/// Wait until the registry shows `expected` live subscribers for `api_key`.
pub async fn wait_for_subscribers(state: &ServerState, api_key: &str, expected: usize) {
    for _ in 0..100 {
        if state.ws.registry.key_count(api_key).await == expected {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("registry never reached {expected} subscribers for key '{api_key}'");
}
