pub mod api_key_validator;
pub mod error;

pub use api_key_validator::ApiKeyValidator;
pub use error::{AuthError, Result};

#[cfg(test)]
mod tests;
