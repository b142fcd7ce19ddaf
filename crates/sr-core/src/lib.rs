pub mod error;
pub mod models;

pub use error::{CoreError, Result};
pub use models::reading::SensorReading;
pub use models::reading_payload::ReadingPayload;

pub use error_location::ErrorLocation;
