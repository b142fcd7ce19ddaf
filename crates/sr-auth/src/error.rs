use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Expected API key not configured on the server {location}")]
    NotConfigured { location: ErrorLocation },

    #[error("Missing API key {location}")]
    MissingKey { location: ErrorLocation },

    #[error("Invalid API key {location}")]
    InvalidKey { location: ErrorLocation },
}

pub type Result<T> = std::result::Result<T, AuthError>;
