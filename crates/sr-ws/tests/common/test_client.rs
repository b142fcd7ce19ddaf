#![allow(dead_code)]

use axum_test::{TestServer, TestWebSocket, WsMessage};

/// WebSocket test client for the readings stream
pub struct WsTestClient {
    ws: TestWebSocket,
}

impl WsTestClient {
    /// Connect with an `api-key` query parameter. The upgrade always
    /// succeeds; a refused subscriber sees a close frame instead.
    pub async fn connect(server: &TestServer, api_key: &str) -> Self {
        let ws = server
            .get_websocket(&format!("/ws/readings?api-key={api_key}"))
            .await
            .into_websocket()
            .await;

        Self { ws }
    }

    /// Connect without any api-key query parameter
    pub async fn connect_without_key(server: &TestServer) -> Self {
        let ws = server
            .get_websocket("/ws/readings")
            .await
            .into_websocket()
            .await;

        Self { ws }
    }

    /// Receive one text frame
    pub async fn receive_text(&mut self) -> String {
        self.ws.receive_text().await
    }

    /// Receive one raw frame
    pub async fn receive_message(&mut self) -> WsMessage {
        self.ws.receive_message().await
    }

    /// Assert that the server closed this subscriber with the given reason
    pub async fn expect_policy_close(&mut self, reason_fragment: &str) {
        let message = self.ws.receive_message().await;
        match message {
            WsMessage::Close(frame) => {
                let description = format!("{frame:?}");
                assert!(
                    description.contains(reason_fragment),
                    "close frame {description} does not mention '{reason_fragment}'"
                );
            }
            other => panic!("expected close frame, got {other:?}"),
        }
    }

    /// Close the WebSocket connection
    pub async fn close(self) {
        self.ws.close().await;
    }
}

/// Create multiple subscribers for the same key (helper for broadcast tests)
pub async fn create_subscribers(server: &TestServer, api_key: &str, count: usize) -> Vec<WsTestClient> {
    let mut clients = Vec::with_capacity(count);
    for _ in 0..count {
        clients.push(WsTestClient::connect(server, api_key).await);
    }
    clients
}
