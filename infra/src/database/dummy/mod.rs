//! In-memory stand-in for a SQL database holding the `grades` table

mod connection;
mod grade_repository_impl;

pub use connection::DummyConnection;
pub use grade_repository_impl::SqlGradeRepository;
