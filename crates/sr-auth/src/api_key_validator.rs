use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use log::warn;

/// Validates presented API keys against one configured secret.
///
/// The server holds two of these: one for the ingestion surface (header key)
/// and one for the streaming surface (query key). A validator with no
/// configured secret rejects everything - the surface stays closed rather
/// than open when the operator forgot to set a key.
#[derive(Debug, Clone)]
pub struct ApiKeyValidator {
    expected: Option<String>,
    surface: &'static str,
}

impl ApiKeyValidator {
    pub fn new(expected: Option<String>, surface: &'static str) -> Self {
        Self { expected, surface }
    }

    /// Check a presented key. Missing and mismatched keys are distinct
    /// failures so callers can log them apart.
    pub fn verify(&self, presented: Option<&str>) -> AuthErrorResult<()> {
        let Some(expected) = self.expected.as_deref().filter(|k| !k.is_empty()) else {
            warn!(
                "Server error: expected API key ({}) not configured",
                self.surface
            );
            return Err(AuthError::NotConfigured {
                location: ErrorLocation::from(Location::caller()),
            });
        };

        match presented {
            None => Err(AuthError::MissingKey {
                location: ErrorLocation::from(Location::caller()),
            }),
            Some(key) if constant_time_eq(key.as_bytes(), expected.as_bytes()) => Ok(()),
            Some(_) => {
                warn!("Attempt to access {} with invalid API key", self.surface);
                Err(AuthError::InvalidKey {
                    location: ErrorLocation::from(Location::caller()),
                })
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.expected.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Length-leaking but content-constant comparison; good enough for
/// shared-secret API keys of fixed operator-chosen length.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
