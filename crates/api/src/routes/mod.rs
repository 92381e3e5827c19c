pub mod character;
pub mod health;
pub mod statistics;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /characters?name=                   resolve character snapshot (GET)
///
/// /statistics?character=              shaped statistics (GET)
/// /statistics                         submit batch (POST, basic auth)
/// /statistics/{name}                  delete statistics (DELETE, basic auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/characters", character::router())
        .nest("/statistics", statistics::router())
}

/// Routes kept outside `/api/v1` for older consumers.
///
/// ```text
/// /retrieving/v1/character?name=      resolve character snapshot (GET)
/// ```
pub fn legacy_routes() -> Router<AppState> {
    Router::new().nest("/retrieving/v1/character", character::router())
}
