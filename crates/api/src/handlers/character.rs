//! Handlers for character snapshots.

use armory_core::character::CharacterRecord;
use axum::extract::{Query, State};
use axum::Json;

use crate::error::AppResult;
use crate::query::NameParams;
use crate::state::AppState;

/// GET /api/v1/characters?name={name}
///
/// Also mounted at `/retrieving/v1/character` for older consumers.
pub async fn get_character(
    State(state): State<AppState>,
    Query(params): Query<NameParams>,
) -> AppResult<Json<CharacterRecord>> {
    let character = state.characters.resolve(&params.name).await?;
    Ok(Json(character))
}
