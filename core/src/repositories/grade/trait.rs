//! Grade repository trait binding the `Grade` entity to a table.

use async_trait::async_trait;

use crate::domain::entities::grade::{Grade, GradesQuery};
use crate::errors::DomainError;

/// Table the grade records live in
pub const GRADES_TABLE: &str = "grades";

/// Repository trait for `Grade` persistence
///
/// Implementations translate each call into a query against a SQL
/// connection; the shape of those queries is the implementation's concern.
#[async_trait]
pub trait GradeRepository: Send + Sync {
    /// Create the backing table if the backend needs one
    async fn create_table(&self) -> Result<(), DomainError>;

    /// List grades, optionally restricted by `query`
    ///
    /// # Returns
    /// * `Ok(Vec<Grade>)` - Matching grades in insertion order
    /// * `Err(DomainError)` - The backend failed or returned rows that are not grades
    async fn find_all(&self, query: Option<&GradesQuery>) -> Result<Vec<Grade>, DomainError>;

    /// Persist a new grade and return it
    async fn save(&self, grade: Grade) -> Result<Grade, DomainError>;

    /// Remove every grade
    async fn delete_all(&self) -> Result<(), DomainError>;

    /// Remove the grade with the given row id
    async fn delete(&self, id: i64) -> Result<(), DomainError>;
}
