//! Axum extractor for ingestion authentication

use crate::api::error::ApiError;
use crate::state::ServerState;

use std::future::Future;

use axum::{extract::FromRequestParts, http::request::Parts};

/// Validates the `X-API-Key` header against the configured ingestion key.
///
/// Rejection happens before the body is read, so an unauthorized caller
/// never reaches payload parsing.
pub struct IngestKey;

impl FromRequestParts<ServerState> for IngestKey {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let presented = parts
                .headers
                .get("X-API-Key")
                .and_then(|value| value.to_str().ok());

            state.ingest_validator.verify(presented)?;

            Ok(IngestKey)
        }
    }
}
