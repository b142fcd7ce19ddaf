
use crate::{ConnectionLimits, ConnectionRegistry, Metrics};

use sr_core::{ReadingPayload, SensorReading};

pub(crate) fn registry_with_quota(max_per_key: usize) -> ConnectionRegistry {
    ConnectionRegistry::new(ConnectionLimits::per_key(max_per_key), Metrics::new())
}

pub(crate) fn sample_reading(sensor_id: &str) -> SensorReading {
    let payload = ReadingPayload {
        sensor_id: sensor_id.to_string(),
        temperature: 21.5,
        humidity: 48.0,
        pressure: 1013.2,
    };
    SensorReading::from_payload(&payload, Some("10.0.0.7".to_string()))
}
