use std::time::Duration;

/// Configuration for WebSocket connections and delivery attempts
#[derive(Debug, Clone, Copy)]
pub struct ConnectionConfig {
    /// Outgoing buffer per connection (bounded to handle backpressure)
    pub send_buffer_size: usize,
    /// Bound on a single delivery attempt; a send that does not complete
    /// within this window is treated as failed
    pub send_timeout_ms: u64,
}

impl ConnectionConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: 100,
            send_timeout_ms: 5_000,
        }
    }
}
