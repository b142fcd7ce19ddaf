pub mod api;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;
pub mod state;

pub use crate::routes::build_router;
pub use crate::state::ServerState;

use sr_auth::ApiKeyValidator;
use sr_db::{DbStatus, MIGRATOR, ReadingRepository};
use sr_ws::{
    AppState, BroadcastDispatcher, ConnectionConfig, ConnectionLimits, ConnectionRegistry, Metrics,
    ShutdownCoordinator,
};

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, warn};
use metrics_exporter_prometheus::PrometheusBuilder;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let config = sr_config::Config::load()?;
    config.validate()?;

    // Construct log file path if configured
    let log_file_path: Option<std::path::PathBuf> = if let Some(ref filename) = config.logging.file
    {
        let config_dir = sr_config::Config::config_dir()?;
        let log_dir = config_dir.join(&config.logging.dir);

        // Ensure log directory exists
        std::fs::create_dir_all(&log_dir)?;

        Some(log_dir.join(filename))
    } else {
        None
    };

    // Initialize logger (before any other logging)
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting sr-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    if !config.auth.http_configured() {
        warn!("Ingestion API key is not set (SR_API_KEY); all ingestion requests will fail");
    }
    if !config.auth.ws_configured() {
        warn!("Streaming API key is not set (SR_WS_API_KEY); all subscribers will be refused");
    }

    // Install the Prometheus recorder before any metrics are emitted
    let metrics_handle = PrometheusBuilder::new().install_recorder()?;

    // Initialize database pool. The pool is lazy so a broken database does
    // not stop the server; ingestion and broadcast run without it.
    let database_path = config.database_path()?;
    info!("Using database: {}", database_path.display());

    let pool = SqlitePoolOptions::new().max_connections(10).connect_lazy_with(
        SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(5)),
    );

    let db_status = DbStatus::new(true);

    // Run migrations
    info!("Running database migrations...");
    match MIGRATOR.run(&pool).await {
        Ok(()) => info!("Migrations complete"),
        Err(e) => {
            error!("Database unavailable at startup ({e}); continuing without persistence");
            db_status.mark_offline();
        }
    }

    // Key validators for the two surfaces
    let ingest_validator = Arc::new(ApiKeyValidator::new(
        config.auth.api_key.clone(),
        "ingestion",
    ));
    let ws_validator = Arc::new(ApiKeyValidator::new(
        config.auth.ws_api_key.clone(),
        "streaming",
    ));

    // Core: registry and dispatcher
    let metrics = Metrics::new();
    let registry = ConnectionRegistry::new(
        ConnectionLimits::per_key(config.websocket.max_connections_per_key),
        metrics.clone(),
    );

    let connection_config = ConnectionConfig {
        send_buffer_size: config.websocket.send_buffer_size,
        send_timeout_ms: config.websocket.send_timeout_ms,
    };

    let dispatcher =
        BroadcastDispatcher::new(registry.clone(), connection_config, metrics.clone());

    let shutdown = ShutdownCoordinator::new();

    // Build application state
    let app_state = AppState {
        validator: ws_validator,
        registry,
        repository: ReadingRepository::new(pool),
        db_status,
        metrics,
        shutdown: shutdown.clone(),
        config: connection_config,
    };

    let server_state = ServerState {
        ws: app_state,
        ingest_validator,
        dispatcher,
    };

    // Build router
    let app = build_router(server_state, metrics_handle);

    // Create TCP listener
    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr).await?;

    // Get actual bound address (important when port is 0 / auto-assigned)
    let actual_addr = listener.local_addr()?;
    info!("Server listening on {}", actual_addr);

    // Spawn signal handler for graceful shutdown
    let shutdown_for_signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                shutdown_for_signal.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for SIGINT: {}", e);
            }
        }
    });

    // Start server with graceful shutdown; connect info gives each reading
    // its client address
    info!("Server ready to accept connections");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown.subscribe_guard().wait().await;
        info!("Graceful shutdown complete");
    })
    .await?;

    Ok(())
}
