use crate::{ConnectionId, Result as WsErrorResult, WsError};

use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use error_location::ErrorLocation;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendTimeoutError;

/// Delivery endpoint for one live subscriber.
///
/// The registry and the dispatcher only ever see this handle: a bounded
/// channel into the connection's send task. Transport details stay inside
/// `WebSocketConnection`. Dropping the last handle closes the channel, which
/// the connection observes as its cue to shut down.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub api_key: Arc<str>,
    sender: mpsc::Sender<Message>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, api_key: Arc<str>, sender: mpsc::Sender<Message>) -> Self {
        Self {
            id,
            api_key,
            sender,
        }
    }

    /// Attempt one bounded delivery. A full buffer that does not drain within
    /// `timeout` counts as failure; so does a closed connection.
    pub async fn deliver(&self, message: Message, timeout: Duration) -> WsErrorResult<()> {
        match self.sender.send_timeout(message, timeout).await {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(_)) => Err(WsError::SendTimeout {
                timeout_ms: timeout.as_millis() as u64,
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(SendTimeoutError::Closed(_)) => Err(WsError::ConnectionClosed {
                reason: "receiver dropped".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    /// Enqueue without waiting; used for the initial catch-up message where
    /// the buffer is known to be empty.
    pub fn enqueue(&self, message: Message) -> WsErrorResult<()> {
        self.sender.try_send(message).map_err(|_| WsError::SendFailed {
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
