use sr_auth::ApiKeyValidator;
use sr_ws::{AppState, BroadcastDispatcher};

use std::sync::Arc;

use axum::extract::FromRef;

/// Shared state for the whole router.
///
/// The WebSocket endpoint only needs `AppState`; the ingestion endpoint also
/// needs the dispatcher and its own validator. `FromRef` lets the WebSocket
/// handler keep its narrower state type.
#[derive(Clone)]
pub struct ServerState {
    pub ws: AppState,
    pub ingest_validator: Arc<ApiKeyValidator>,
    pub dispatcher: BroadcastDispatcher,
}

impl FromRef<ServerState> for AppState {
    fn from_ref(state: &ServerState) -> AppState {
        state.ws.clone()
    }
}
