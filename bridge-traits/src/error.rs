use thiserror::Error;

/// Errors surfaced by collaborator implementations.
///
/// The variants carry a structured classification so that callers can decide
/// on retry policy without inspecting message text.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// A concurrent write to the same parent collection raced with this one.
    #[error("Conflicting concurrent modification: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Whether this error is a transient write conflict that may succeed on retry.
    pub fn is_conflict(&self) -> bool {
        matches!(self, BridgeError::Conflict(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
