pub mod api;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;
pub mod state;

#[cfg(test)]
mod tests;

pub use api::{
    error::{ApiError, Result as ApiResult},
    extractors::{client_ip::ClientIp, ingest_key::IngestKey},
    readings::{reading_response::ReadingResponse, readings::create_reading},
};

pub use crate::routes::build_router;
pub use crate::state::ServerState;
