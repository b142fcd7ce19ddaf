use crate::ReadingPayload;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ingested sensor measurement.
///
/// Built once by the ingestion path and never mutated afterwards; the same
/// value is shared read-only across all in-flight broadcast deliveries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    /// Database row id. `None` when the reading could not be persisted
    /// (database offline) but was still broadcast.
    pub id: Option<i64>,

    pub sensor_id: String,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,

    pub recorded_at: DateTime<Utc>,

    /// Address of the device that submitted the reading.
    pub client_ip: Option<String>,
}

impl SensorReading {
    /// Build a reading from a validated ingestion payload, stamped now.
    pub fn from_payload(payload: &ReadingPayload, client_ip: Option<String>) -> Self {
        Self {
            id: None,
            sensor_id: payload.sensor_id.clone(),
            temperature: payload.temperature,
            humidity: payload.humidity,
            pressure: payload.pressure,
            recorded_at: Utc::now(),
            client_ip,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}
