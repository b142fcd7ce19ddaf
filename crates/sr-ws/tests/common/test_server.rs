#![allow(dead_code)]

use sr_auth::ApiKeyValidator;
use sr_db::{DbStatus, MIGRATOR, ReadingRepository};
use sr_ws::{
    AppState, BroadcastDispatcher, ConnectionConfig, ConnectionLimits, ConnectionRegistry, Metrics,
    ShutdownCoordinator,
};

use std::sync::Arc;

use axum::{Router, routing::any};
use axum_test::TestServer;
use sqlx::sqlite::SqlitePoolOptions;

/// API key every test subscriber presents
pub const TEST_WS_API_KEY: &str = "test-ws-api-key";

/// Configuration for test server instances
#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub ws_api_key: Option<String>,
    pub max_connections_per_key: usize,
    pub send_buffer_size: usize,
    pub send_timeout_ms: u64,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            ws_api_key: Some(TEST_WS_API_KEY.to_string()),
            max_connections_per_key: 0,
            send_buffer_size: 16,
            send_timeout_ms: 500,
        }
    }
}

impl TestServerConfig {
    /// Config with a tight per-key quota (for quota tests)
    pub fn with_quota(max_connections_per_key: usize) -> Self {
        Self {
            max_connections_per_key,
            ..Default::default()
        }
    }

    /// Config where the operator never set a streaming key
    pub fn without_ws_key() -> Self {
        Self {
            ws_api_key: None,
            ..Default::default()
        }
    }
}

/// Test server plus the state and dispatcher the tests drive directly
pub struct TestServerWithState {
    pub server: TestServer,
    pub app_state: AppState,
    pub dispatcher: BroadcastDispatcher,
}

pub async fn create_test_server() -> TestServerWithState {
    create_test_server_with_config(TestServerConfig::default()).await
}

pub async fn create_test_server_with_config(config: TestServerConfig) -> TestServerWithState {
    let (app, app_state, dispatcher) = create_app(config).await;
    let server = TestServer::builder()
        .http_transport()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithState {
        server,
        app_state,
        dispatcher,
    }
}

/// Wait until the registry shows `expected` live subscribers for `api_key`.
///
/// Registration happens on the accepted socket after the upgrade response,
/// so a client that has connected may not be registered yet.
pub async fn wait_for_subscribers(app_state: &AppState, api_key: &str, expected: usize) {
    for _ in 0..100 {
        if app_state.registry.key_count(api_key).await == expected {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!(
        "registry never reached {expected} subscribers for key '{api_key}' (saw {})",
        app_state.registry.key_count(api_key).await
    );
}

async fn create_app(config: TestServerConfig) -> (Router, AppState, BroadcastDispatcher) {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    MIGRATOR.run(&pool).await.expect("migrations");

    let validator = Arc::new(ApiKeyValidator::new(config.ws_api_key, "streaming"));

    let limits = ConnectionLimits::per_key(config.max_connections_per_key);
    let metrics = Metrics::default();
    let registry = ConnectionRegistry::new(limits, metrics.clone());

    let connection_config = ConnectionConfig {
        send_buffer_size: config.send_buffer_size,
        send_timeout_ms: config.send_timeout_ms,
    };

    let dispatcher = BroadcastDispatcher::new(registry.clone(), connection_config, metrics.clone());

    let app_state = AppState {
        validator,
        registry,
        repository: ReadingRepository::new(pool),
        db_status: DbStatus::new(true),
        metrics,
        shutdown: ShutdownCoordinator::new(),
        config: connection_config,
    };

    let router = Router::new()
        .route("/ws/readings", any(sr_ws::handler))
        .with_state(app_state.clone());

    (router, app_state, dispatcher)
}
