use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::statistics;
use crate::state::AppState;

/// Routes mounted at `/statistics`.
///
/// ```text
/// GET    /?character={name}   -> get_statistics
/// POST   /                    -> post_statistics (basic auth)
/// DELETE /{name}              -> delete_statistics (basic auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(statistics::get_statistics).post(statistics::post_statistics),
        )
        .route("/{name}", delete(statistics::delete_statistics))
}
