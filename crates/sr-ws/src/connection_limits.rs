/// Configuration for connection admission limits
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionLimits {
    /// Maximum live connections per API key. 0 = unlimited.
    pub max_per_key: usize,
}

impl ConnectionLimits {
    pub fn unlimited() -> Self {
        Self { max_per_key: 0 }
    }

    pub fn per_key(max_per_key: usize) -> Self {
        Self { max_per_key }
    }
}
