use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Send buffer size constraints
pub const MIN_SEND_BUFFER_SIZE: usize = 1;
pub const MAX_SEND_BUFFER_SIZE: usize = 10000;
pub const DEFAULT_SEND_BUFFER_SIZE: usize = 100;

// Delivery attempt timeout constraints (milliseconds)
pub const MIN_SEND_TIMEOUT_MS: u64 = 10;
pub const MAX_SEND_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_SEND_TIMEOUT_MS: u64 = 5_000;

// Per-key connection quota constraints (0 = unlimited)
pub const MAX_MAX_CONNECTIONS_PER_KEY: usize = 100_000;
pub const DEFAULT_MAX_CONNECTIONS_PER_KEY: usize = 0;

/// WebSocket fan-out settings.
/// All values validated to be within reasonable operational ranges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebSocketConfig {
    /// Outgoing buffer per connection (bounded for backpressure)
    pub send_buffer_size: usize,
    /// Bound on a single delivery attempt in milliseconds; a send that does
    /// not complete within this window counts as failed
    pub send_timeout_ms: u64,
    /// Maximum live connections per API key, 0 = unlimited
    pub max_connections_per_key: usize,
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            send_buffer_size: DEFAULT_SEND_BUFFER_SIZE,
            send_timeout_ms: DEFAULT_SEND_TIMEOUT_MS,
            max_connections_per_key: DEFAULT_MAX_CONNECTIONS_PER_KEY,
        }
    }
}

impl WebSocketConfig {
    /// Validate all fields are within acceptable ranges.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.send_buffer_size < MIN_SEND_BUFFER_SIZE
            || self.send_buffer_size > MAX_SEND_BUFFER_SIZE
        {
            return Err(ConfigError::config(format!(
                "websocket.send_buffer_size must be {}-{}, got {}",
                MIN_SEND_BUFFER_SIZE, MAX_SEND_BUFFER_SIZE, self.send_buffer_size
            )));
        }

        if self.send_timeout_ms < MIN_SEND_TIMEOUT_MS || self.send_timeout_ms > MAX_SEND_TIMEOUT_MS
        {
            return Err(ConfigError::config(format!(
                "websocket.send_timeout_ms must be {}-{}, got {}",
                MIN_SEND_TIMEOUT_MS, MAX_SEND_TIMEOUT_MS, self.send_timeout_ms
            )));
        }

        if self.max_connections_per_key > MAX_MAX_CONNECTIONS_PER_KEY {
            return Err(ConfigError::config(format!(
                "websocket.max_connections_per_key must be 0 (unlimited) or <= {}, got {}",
                MAX_MAX_CONNECTIONS_PER_KEY, self.max_connections_per_key
            )));
        }

        Ok(())
    }
}
