//! Token error taxonomy
//!
//! Every failure of the JWT core maps onto one [`Rejection`], which the
//! presentation layer turns into a response status. Signature and structural
//! failures are `Unauthorized`; tokens that verify but carry invalid time
//! claims are `BadRequest`.

use std::fmt;
use thiserror::Error;

/// Outcome class reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    BadRequest,
    Unauthorized,
    NotFound,
    Internal,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rejection::BadRequest => "bad_request",
            Rejection::Unauthorized => "unauthorized",
            Rejection::NotFound => "not_found",
            Rejection::Internal => "internal_error",
        };
        f.write_str(name)
    }
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Key material could not be read or parsed at start-up
    #[error("Failed to load key {path}: {message}")]
    KeyLoadError { path: String, message: String },

    /// Issuance requested a key id that is not configured (or none at all)
    #[error("Unknown key id: {kid:?}")]
    UnknownKeyId { kid: String },

    #[error("Missing or invalid Authorization header")]
    InvalidAuthorizationHeader,

    #[error("Token header has no key id")]
    MissingKeyId,

    /// Verification found a key id with no configured verifier
    #[error("No verification key for key id: {kid:?}")]
    UnverifiableKeyId { kid: String },

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Invalid token format: {message}")]
    InvalidTokenFormat { message: String },

    #[error("Token expired")]
    TokenExpired,

    #[error("Token issued in the future")]
    IssuedInFuture,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Token generation failed: {message}")]
    TokenGenerationFailed { message: String },
}

impl TokenError {
    pub fn rejection(&self) -> Rejection {
        match self {
            TokenError::UnknownKeyId { .. }
            | TokenError::TokenExpired
            | TokenError::IssuedInFuture
            | TokenError::TokenNotYetValid => Rejection::BadRequest,
            TokenError::InvalidAuthorizationHeader
            | TokenError::MissingKeyId
            | TokenError::UnverifiableKeyId { .. }
            | TokenError::InvalidSignature
            | TokenError::InvalidTokenFormat { .. } => Rejection::Unauthorized,
            TokenError::KeyLoadError { .. } | TokenError::TokenGenerationFailed { .. } => {
                Rejection::Internal
            }
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::KeyLoadError { .. } => "key_load_error",
            TokenError::UnknownKeyId { .. } => "unknown_key_id",
            TokenError::InvalidAuthorizationHeader => "invalid_authorization_header",
            TokenError::MissingKeyId => "missing_key_id",
            TokenError::UnverifiableKeyId { .. } => "unverifiable_key_id",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::InvalidTokenFormat { .. } => "invalid_token_format",
            TokenError::TokenExpired => "token_expired",
            TokenError::IssuedInFuture => "token_issued_in_future",
            TokenError::TokenNotYetValid => "token_not_yet_valid",
            TokenError::TokenGenerationFailed { .. } => "token_generation_failed",
        }
    }
}
