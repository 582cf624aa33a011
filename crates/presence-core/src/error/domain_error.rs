//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::SessionIdError;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid session id: {0}")]
    InvalidSessionId(#[from] SessionIdError),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::SessionNotFound(_) => "UNKNOWN_SESSION",
            Self::InvalidSessionId(_) => "INVALID_SESSION_ID",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidSessionId(_))
    }
}
