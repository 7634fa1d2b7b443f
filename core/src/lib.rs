//! # Starter Kit Core
//!
//! Core domain layer for the starter kit server.
//! This crate contains the domain entities, the JWT issuance/verification
//! services, repository interfaces and error types that the infrastructure
//! and HTTP layers build on.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    Book, Grade, GradesQuery, SessionData, SignedToken, TokenClaims, TokenDetails, TokenHeader,
};
pub use errors::{DomainError, DomainResult, Rejection, TokenError};
pub use repositories::{GradeRepository, SessionStore};
pub use services::{KeyResolver, TokenService, TokenServiceConfig};
