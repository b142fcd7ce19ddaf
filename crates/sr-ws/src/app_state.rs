use crate::{
    ConnectionConfig, ConnectionRegistry, Metrics, ShutdownCoordinator, WebSocketConnection,
};

use sr_auth::ApiKeyValidator;
use sr_db::{DbStatus, ReadingRepository};

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::Response,
};
use log::{debug, error, info, warn};
use serde::Deserialize;
use tokio::sync::mpsc;

/// Shared application state for the WebSocket endpoint
#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<ApiKeyValidator>,
    pub registry: ConnectionRegistry,
    pub repository: ReadingRepository,
    pub db_status: DbStatus,
    pub metrics: Metrics,
    pub shutdown: ShutdownCoordinator,
    pub config: ConnectionConfig,
}

#[derive(Debug, Deserialize)]
pub struct SubscribeQuery {
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,
}

/// WebSocket upgrade handler for the readings stream.
///
/// The upgrade itself always succeeds; credential and quota checks run on the
/// accepted socket, which is then closed with a policy-violation frame when
/// they fail. Browsers cannot read HTTP error bodies on a failed upgrade, so
/// a close reason is the only way to tell the client what went wrong.
pub async fn handler(
    State(state): State<AppState>,
    Query(query): Query<SubscribeQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    debug!("WebSocket upgrade requested for readings stream");
    ws.on_upgrade(move |socket| accept(socket, state, query.api_key))
}

async fn accept(socket: WebSocket, state: AppState, api_key: Option<String>) {
    let Some(api_key) = api_key else {
        warn!("WebSocket subscriber refused: no api-key query parameter");
        close_with_policy_violation(socket, "invalid or missing API key").await;
        return;
    };

    if let Err(e) = state.validator.verify(Some(&api_key)) {
        warn!("WebSocket subscriber refused: {e}");
        close_with_policy_violation(socket, "invalid or missing API key").await;
        return;
    }

    let (tx, rx) = mpsc::channel::<Message>(state.config.send_buffer_size);
    let handle = match state.registry.register(&api_key, tx).await {
        Ok(handle) => handle,
        Err(e) => {
            warn!("WebSocket subscriber refused: {e}");
            close_with_policy_violation(socket, "connection quota exceeded for this key").await;
            return;
        }
    };

    // Catch the subscriber up with the most recent stored reading
    if state.db_status.is_online() {
        match state.repository.find_latest().await {
            Ok(Some(reading)) => match serde_json::to_string(&reading) {
                Ok(json) => {
                    if let Err(e) = handle.enqueue(Message::Text(json.into())) {
                        warn!("Could not queue latest reading for {}: {e}", handle.id);
                    }
                }
                Err(e) => error!("Latest reading could not be encoded: {e}"),
            },
            Ok(None) => debug!("No stored readings yet, nothing to catch up"),
            Err(e) => {
                warn!("Latest reading lookup failed, continuing without catch-up: {e}");
                state.db_status.mark_offline();
            }
        }
    }

    info!("Subscriber {} accepted for key '{api_key}'", handle.id);

    let shutdown_guard = state.shutdown.subscribe_guard();
    let connection =
        WebSocketConnection::new(handle, rx, state.registry.clone(), state.metrics.clone());

    if let Err(e) = connection.run(socket, shutdown_guard).await {
        debug!("Subscriber session ended with error: {e}");
    }
}

async fn close_with_policy_violation(mut socket: WebSocket, reason: &'static str) {
    let frame = CloseFrame {
        code: close_code::POLICY,
        reason: reason.into(),
    };
    if socket.send(Message::Close(Some(frame))).await.is_err() {
        debug!("Client went away before the close frame was sent");
    }
}
