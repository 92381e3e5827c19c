pub mod character;
pub mod statistics;

use serde::Serialize;

/// `{ "status": ... }` acknowledgement body for write endpoints.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}
