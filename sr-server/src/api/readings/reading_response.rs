use sr_core::SensorReading;

use serde::Serialize;

/// Response body for a successfully ingested reading.
///
/// `reading.id` is null when the database was offline and the reading was
/// broadcast without being persisted.
#[derive(Debug, Serialize)]
pub struct ReadingResponse {
    pub reading: SensorReading,
    /// How many live subscribers the reading was delivered to
    pub subscribers_notified: usize,
    pub persisted: bool,
}
