//! Ingestion REST handler: persist a reading, then fan it out.

use crate::api::error::Result as ApiResult;
use crate::api::extractors::{client_ip::ClientIp, ingest_key::IngestKey};
use crate::api::readings::reading_response::ReadingResponse;
use crate::state::ServerState;

use sr_core::{ReadingPayload, SensorReading};

use axum::{Json, extract::State, http::StatusCode};
use log::{info, warn};

/// POST /api/readings
///
/// Accepts one sensor reading, stores it when the database is reachable, and
/// broadcasts it to all live subscribers either way. A database failure marks
/// the database offline and the reading goes out with a null id; ingestion
/// never fails because storage did.
pub async fn create_reading(
    _auth: IngestKey,
    ClientIp(client_ip): ClientIp,
    State(state): State<ServerState>,
    Json(payload): Json<ReadingPayload>,
) -> ApiResult<(StatusCode, Json<ReadingResponse>)> {
    payload.validate()?;

    let mut reading = SensorReading::from_payload(&payload, client_ip);

    if state.ws.db_status.is_online() {
        match state.ws.repository.insert(&reading).await {
            Ok(stored) => reading = stored,
            Err(e) => {
                warn!("Reading from '{}' not persisted: {e}", reading.sensor_id);
                state.ws.db_status.mark_offline();
            }
        }
    } else {
        warn!(
            "Database offline, broadcasting reading from '{}' without persisting",
            reading.sensor_id
        );
    }

    let subscribers_notified = state.dispatcher.publish(&reading).await;

    info!(
        "Ingested reading from '{}' (persisted: {}, notified: {subscribers_notified})",
        reading.sensor_id,
        reading.id.is_some()
    );

    let persisted = reading.id.is_some();
    Ok((
        StatusCode::CREATED,
        Json(ReadingResponse {
            reading,
            subscribers_notified,
            persisted,
        }),
    ))
}
