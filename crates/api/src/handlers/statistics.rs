//! Handlers for character statistics.
//!
//! Reads are public; submissions and deletions require the statistics
//! basic-auth credentials.

use armory_core::statistics::{CharacterStatistics, StatisticsRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::AppResult;
use crate::handlers::StatusResponse;
use crate::middleware::StatisticsWriter;
use crate::query::CharacterParams;
use crate::state::AppState;

/// GET /api/v1/statistics?character={name}
pub async fn get_statistics(
    State(state): State<AppState>,
    Query(params): Query<CharacterParams>,
) -> AppResult<Json<CharacterStatistics>> {
    let stats = state.statistics.get(&params.character).await?;
    Ok(Json(stats))
}

/// POST /api/v1/statistics
///
/// Body is a JSON array of submissions, applied in order. An undecodable
/// body answers 400 `BAD_REQUEST`.
pub async fn post_statistics(
    State(state): State<AppState>,
    writer: StatisticsWriter,
    body: Result<Json<Vec<StatisticsRequest>>, JsonRejection>,
) -> AppResult<(StatusCode, Json<StatusResponse>)> {
    let Json(batch) = body?;
    tracing::debug!(user = %writer.user, entries = batch.len(), "Received statistics batch");
    state.statistics.submit(batch).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(StatusResponse { status: "accepted" }),
    ))
}

/// DELETE /api/v1/statistics/{name}
pub async fn delete_statistics(
    State(state): State<AppState>,
    writer: StatisticsWriter,
    Path(name): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    state.statistics.delete(&name).await?;
    tracing::info!(user = %writer.user, character = %name, "Deleted statistics");
    Ok(Json(StatusResponse { status: "ok" }))
}
