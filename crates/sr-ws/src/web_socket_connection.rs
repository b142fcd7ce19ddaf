use crate::{
    ConnectionHandle, ConnectionRegistry, Metrics, Result as WsErrorResult, ShutdownGuard, WsError,
};

use sr_core::ErrorLocation;

use std::panic::Location;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

/// Manages a single subscriber WebSocket for its whole lifetime.
///
/// The connection owns the receive end of its delivery channel. When the
/// registry releases this connection (a failed delivery, or an explicit
/// release), the channel closes and the loop below exits, so a connection
/// evicted by the dispatcher tears itself down without extra signalling.
pub struct WebSocketConnection {
    handle: ConnectionHandle,
    outbox: mpsc::Receiver<Message>,
    registry: ConnectionRegistry,
    metrics: Metrics,
}

impl WebSocketConnection {
    pub fn new(
        handle: ConnectionHandle,
        outbox: mpsc::Receiver<Message>,
        registry: ConnectionRegistry,
        metrics: Metrics,
    ) -> Self {
        Self {
            handle,
            outbox,
            registry,
            metrics,
        }
    }

    /// Drive the connection until the client leaves, the registry evicts it,
    /// or the server shuts down. Always releases the registry slot on exit.
    pub async fn run(
        mut self,
        socket: WebSocket,
        mut shutdown_guard: ShutdownGuard,
    ) -> WsErrorResult<()> {
        log::info!(
            "WebSocket connection {} established for key '{}'",
            self.handle.id,
            self.handle.api_key
        );

        let (mut ws_sender, mut ws_receiver) = socket.split();

        let result = loop {
            tokio::select! {
                // Deliveries queued by the dispatcher
                outgoing = self.outbox.recv() => {
                    match outgoing {
                        Some(msg) => {
                            if let Err(e) = ws_sender.send(msg).await {
                                break Err(WsError::ConnectionClosed {
                                    reason: format!("socket send failed: {e}"),
                                    location: ErrorLocation::from(Location::caller()),
                                });
                            }
                        }
                        // All senders dropped: the registry evicted us
                        None => {
                            log::info!(
                                "Connection {} evicted by registry, closing socket",
                                self.handle.id
                            );
                            break Ok(());
                        }
                    }
                }

                // Frames from the client
                incoming = ws_receiver.next() => {
                    match incoming {
                        Some(Ok(msg)) => {
                            if let Err(e) = Self::handle_client_frame(msg, &mut ws_sender).await {
                                break Err(e);
                            }
                        }
                        Some(Err(e)) => {
                            break Err(WsError::ConnectionClosed {
                                reason: format!("WebSocket error: {e}"),
                                location: ErrorLocation::from(Location::caller()),
                            });
                        }
                        None => {
                            log::info!("Connection {} closed by client", self.handle.id);
                            break Ok(());
                        }
                    }
                }

                _ = shutdown_guard.wait() => {
                    log::info!("Shutting down connection {} gracefully", self.handle.id);
                    break Ok(());
                }
            }
        };

        self.registry
            .release(&self.handle.api_key, self.handle.id)
            .await;

        if let Err(e) = &result {
            self.metrics.connection_error();
            log::warn!("Connection {} ended with error: {e}", self.handle.id);
        }

        log::info!(
            "WebSocket connection {} closed for key '{}'",
            self.handle.id,
            self.handle.api_key
        );

        result
    }

    /// Subscribers are read-only. Pings are answered, close is honored, and
    /// anything else is ignored.
    async fn handle_client_frame(
        msg: Message,
        ws_sender: &mut (impl SinkExt<Message> + Unpin),
    ) -> WsErrorResult<()> {
        match msg {
            Message::Ping(data) => {
                ws_sender
                    .send(Message::Pong(data))
                    .await
                    .map_err(|_| WsError::SendFailed {
                        location: ErrorLocation::from(Location::caller()),
                    })
            }
            Message::Text(text) => {
                log::debug!("Ignoring inbound text frame from subscriber: {text}");
                Ok(())
            }
            Message::Binary(data) => {
                log::debug!("Ignoring inbound binary frame ({} bytes)", data.len());
                Ok(())
            }
            Message::Pong(_) | Message::Close(_) => Ok(()),
        }
    }
}
