//! Health endpoint for load balancers.

use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::error::TEMPORARY_HEADER;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// GET /health -- `{"status":"OK"}` while the database answers, 503 otherwise.
async fn health(State(state): State<AppState>) -> Response {
    match armory_db::health_check(&state.pool).await {
        Ok(()) => Json(HealthStatus { status: "OK" }).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            let mut response = (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "UNAVAILABLE",
                }),
            )
                .into_response();
            response
                .headers_mut()
                .insert(TEMPORARY_HEADER, HeaderValue::from_static("true"));
            response
        }
    }
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
