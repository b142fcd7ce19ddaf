use crate::{CoreError, Result as CoreErrorResult};

use serde::{Deserialize, Serialize};

/// Raw ingestion request body for one sensor reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingPayload {
    pub sensor_id: String,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl ReadingPayload {
    /// Validate the payload before it becomes a `SensorReading`.
    pub fn validate(&self) -> CoreErrorResult<()> {
        if self.sensor_id.trim().is_empty() {
            return Err(CoreError::validation(
                "sensor_id must not be empty",
                Some("sensor_id"),
            ));
        }

        if !self.temperature.is_finite() {
            return Err(CoreError::validation(
                "temperature must be a finite number",
                Some("temperature"),
            ));
        }

        if !self.humidity.is_finite() {
            return Err(CoreError::validation(
                "humidity must be a finite number",
                Some("humidity"),
            ));
        }

        if !self.pressure.is_finite() {
            return Err(CoreError::validation(
                "pressure must be a finite number",
                Some("pressure"),
            ));
        }

        Ok(())
    }
}
