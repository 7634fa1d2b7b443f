//! # Infrastructure Layer
//!
//! Concrete implementations of the core repository traits:
//!
//! - **Database**: a SQL `Connection` abstraction, the in-memory
//!   `DummyConnection` backend and the `grades` table binding
//! - **Cache**: the in-memory session store

use sk_core::errors::DomainError;

/// Database module - connection abstraction and mock SQL backend
pub mod database;

/// Cache module - process-local session storage
pub mod cache;

pub use cache::InMemorySessionStore;
pub use database::{Connection, DummyConnection, QueryResult, ResultSet, SqlGradeRepository, Value};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Statement could not be executed
    #[error("Query error: {message}")]
    Query { message: String },
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Database {
            message: err.to_string(),
        }
    }
}
