//! Domain-specific error types and error handling.

mod types;

// Re-export all error types and utilities
pub use types::{Rejection, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Classifies the error into the outcome reported to the caller
    pub fn rejection(&self) -> Rejection {
        match self {
            DomainError::Validation { .. } => Rejection::BadRequest,
            DomainError::NotFound { .. } => Rejection::NotFound,
            DomainError::Database { .. } | DomainError::Internal { .. } => Rejection::Internal,
            DomainError::Token(err) => err.rejection(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_errors_keep_their_rejection() {
        let err: DomainError = TokenError::TokenExpired.into();
        assert_eq!(err.rejection(), Rejection::BadRequest);
        assert_eq!(err.to_string(), "Token expired");

        let err: DomainError = TokenError::InvalidSignature.into();
        assert_eq!(err.rejection(), Rejection::Unauthorized);
    }

    #[test]
    fn test_general_errors_rejection() {
        let err = DomainError::Validation {
            message: "course is required".to_string(),
        };
        assert_eq!(err.rejection(), Rejection::BadRequest);

        let err = DomainError::Database {
            message: "empty query".to_string(),
        };
        assert_eq!(err.rejection(), Rejection::Internal);
    }
}
