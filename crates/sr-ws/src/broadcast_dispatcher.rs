use crate::{ConnectionConfig, ConnectionHandle, ConnectionRegistry, Metrics, WsError};

use sr_core::SensorReading;

use axum::extract::ws::Message;
use futures::future::join_all;

/// Fans one sensor reading out to every live subscriber.
///
/// The reading is encoded exactly once; the per-connection work is only a
/// channel send. Delivery runs against a registry snapshot, never under the
/// registry lock, so one slow subscriber cannot stall admissions or other
/// deliveries. Connections that fail are released after the whole fan-out
/// completes.
pub struct BroadcastDispatcher {
    registry: ConnectionRegistry,
    config: ConnectionConfig,
    metrics: Metrics,
}

impl BroadcastDispatcher {
    pub fn new(registry: ConnectionRegistry, config: ConnectionConfig, metrics: Metrics) -> Self {
        Self {
            registry,
            config,
            metrics,
        }
    }

    /// Publish a reading to all current subscribers, returning how many
    /// deliveries succeeded.
    ///
    /// An encode failure aborts the whole publish with nothing sent. A
    /// delivery failure affects only that connection: it is counted, logged,
    /// and its registry slot is released once iteration is done. Releasing
    /// drops the registry's handle, which closes the connection's channel and
    /// lets the connection task shut itself down.
    pub async fn publish(&self, reading: &SensorReading) -> usize {
        let message = match Self::encode(reading) {
            Ok(message) => message,
            Err(e) => {
                log::error!("Dropping broadcast, reading could not be encoded: {e}");
                self.metrics.encode_failure();
                return 0;
            }
        };

        let snapshot = self.registry.snapshot().await;
        if snapshot.is_empty() {
            log::debug!("No live subscribers, broadcast skipped");
            return 0;
        }

        let timeout = self.config.send_timeout();
        let attempts = snapshot.iter().map(|handle| {
            let message = message.clone();
            async move { (handle, handle.deliver(message, timeout).await) }
        });

        let mut delivered = 0;
        let mut failed: Vec<&ConnectionHandle> = Vec::new();
        for (handle, outcome) in join_all(attempts).await {
            match outcome {
                Ok(()) => delivered += 1,
                Err(e) => {
                    log::warn!(
                        "Delivery to connection {} (key '{}') failed: {e}",
                        handle.id,
                        handle.api_key
                    );
                    self.metrics.publish_failure();
                    failed.push(handle);
                }
            }
        }

        for handle in failed {
            self.registry.release(&handle.api_key, handle.id).await;
        }

        log::debug!(
            "Broadcast reading from sensor '{}' delivered to {delivered}/{} subscribers",
            reading.sensor_id,
            snapshot.len()
        );
        self.metrics.broadcast_published(delivered);

        delivered
    }

    fn encode(reading: &SensorReading) -> Result<Message, WsError> {
        let json = serde_json::to_string(reading)?;
        Ok(Message::Text(json.into()))
    }
}

impl Clone for BroadcastDispatcher {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            config: self.config,
            metrics: self.metrics.clone(),
        }
    }
}
