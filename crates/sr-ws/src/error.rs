use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error(
        "Per-key connection quota exceeded for key '{api_key}': {current} live (max: {max}) {location}"
    )]
    QuotaExceeded {
        api_key: String,
        current: usize,
        max: usize,
        location: ErrorLocation,
    },

    #[error("Send buffer full or receiver gone, connection unusable {location}")]
    SendFailed { location: ErrorLocation },

    #[error("Delivery attempt timed out after {timeout_ms}ms {location}")]
    SendTimeout {
        timeout_ms: u64,
        location: ErrorLocation,
    },

    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Event encode failed: {source} {location}")]
    Encode {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl From<serde_json::Error> for WsError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Encode {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WsError>;
