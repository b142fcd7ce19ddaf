use metrics::{counter, gauge};

/// Metrics collector for registry and broadcast operations
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "sr_ws" }
    }

    /// Record a connection admitted into the registry
    pub fn connection_admitted(&self) {
        counter!(format!("{}.connections.admitted", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).increment(1.0);
    }

    /// Record an admission refused by the per-key quota
    pub fn admission_rejected(&self) {
        counter!(format!("{}.connections.rejected", self.prefix)).increment(1);
    }

    /// Record a connection released from the registry
    pub fn connection_released(&self) {
        counter!(format!("{}.connections.released", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).decrement(1.0);
    }

    /// Record a connection that ended with an error
    pub fn connection_error(&self) {
        counter!(format!("{}.connections.errors", self.prefix)).increment(1);
    }

    /// Record one completed publish with its delivered count
    pub fn broadcast_published(&self, delivered: usize) {
        counter!(format!("{}.broadcast.published", self.prefix)).increment(1);
        counter!(format!("{}.broadcast.delivered", self.prefix)).increment(delivered as u64);
    }

    /// Record a delivery failure to one connection
    pub fn publish_failure(&self) {
        counter!(format!("{}.broadcast.failures", self.prefix)).increment(1);
    }

    /// Record an event that could not be encoded
    pub fn encode_failure(&self) {
        counter!(format!("{}.broadcast.encode_failures", self.prefix)).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
