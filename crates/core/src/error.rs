//! Domain-level error taxonomy shared by all crates.

/// Domain error. The API layer maps each variant onto an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The request was well-formed but violates a domain precondition.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An unexpected internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] with a numeric id.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
