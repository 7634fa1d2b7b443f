//! Database module - connection abstraction and the in-memory SQL backend
//!
//! This module provides:
//! - A `Connection` trait executing SQL text with typed parameters
//! - `DummyConnection`, a mock backend keeping the `grades` table in memory
//! - `SqlGradeRepository`, the `GradeRepository` implementation over a connection

pub mod connection;
pub mod dummy;

// Re-export commonly used types
pub use connection::{Connection, QueryResult, ResultSet, Value};
pub use dummy::{DummyConnection, SqlGradeRepository};
