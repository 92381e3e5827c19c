use axum::routing::get;
use axum::Router;

use crate::handlers::character;
use crate::state::AppState;

/// Routes mounted at `/characters`.
///
/// ```text
/// GET    /?name={name}    -> get_character
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(character::get_character))
}
