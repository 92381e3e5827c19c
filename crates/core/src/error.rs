/// Error taxonomy shared by the services, the stores and the HTTP layer.
///
/// Stores and parsers classify their failures into one of these variants so
/// callers can tell "absent" from "try again later" from "bug".
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A malformed identifier supplied by the caller.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A malformed request entry (statistics batches, delete arguments).
    #[error("Invalid request data: {0}")]
    Request(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// A transient store or network failure; safe for the caller to retry.
    #[error("Temporarily unavailable: {0}")]
    Temporary(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] on the given entity.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
