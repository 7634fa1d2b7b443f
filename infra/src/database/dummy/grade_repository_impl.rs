//! SQL implementation of the GradeRepository trait.
//!
//! Renders one statement per repository call against the `grades` table and
//! maps result rows back into `Grade` entities by column title.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use sk_core::domain::entities::grade::{Grade, GradesQuery};
use sk_core::errors::DomainError;
use sk_core::repositories::grade::{GradeRepository, GRADES_TABLE};

use crate::database::connection::{Connection, QueryResult, ResultSet, Value};

/// Grade repository over any [`Connection`]
pub struct SqlGradeRepository<C: Connection> {
    connection: Arc<C>,
}

impl<C: Connection> SqlGradeRepository<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Arc<C> {
        &self.connection
    }

    fn create_table_sql() -> String {
        format!(
            "CREATE TABLE {} (id INTEGER PRIMARY KEY AUTOINCREMENT, course TEXT NOT NULL, grade INTEGER NOT NULL)",
            GRADES_TABLE
        )
    }

    fn select_all_sql() -> String {
        format!("SELECT * FROM {}", GRADES_TABLE)
    }

    fn select_by_course_sql() -> String {
        format!("SELECT * FROM {0} WHERE {0}.course = ?1", GRADES_TABLE)
    }

    fn insert_sql() -> String {
        format!("INSERT INTO {} (course, grade) VALUES (?1, ?2)", GRADES_TABLE)
    }

    fn delete_all_sql() -> String {
        format!("DELETE FROM {}", GRADES_TABLE)
    }

    fn delete_by_id_sql() -> String {
        format!("DELETE FROM {0} WHERE {0}.id = ?1", GRADES_TABLE)
    }

    /// Convert result rows to Grade entities
    fn rows_to_grades(mut rows: ResultSet) -> Result<Vec<Grade>, DomainError> {
        let course_idx = rows.column("course").ok_or_else(|| DomainError::Database {
            message: "result set has no course column".to_string(),
        })?;
        let grade_idx = rows.column("grade").ok_or_else(|| DomainError::Database {
            message: "result set has no grade column".to_string(),
        })?;

        let mut grades = Vec::with_capacity(rows.len());
        while let Some(row) = rows.fetch_next() {
            let course = row
                .get(course_idx)
                .and_then(Value::as_text)
                .ok_or_else(|| DomainError::Database {
                    message: "course is not text".to_string(),
                })?;
            let grade = row
                .get(grade_idx)
                .and_then(Value::as_int)
                .ok_or_else(|| DomainError::Database {
                    message: "grade is not an integer".to_string(),
                })?;
            grades.push(Grade::new(course, grade));
        }
        Ok(grades)
    }

    fn expect_rows(result: QueryResult) -> Result<Vec<Grade>, DomainError> {
        match result {
            QueryResult::ResultSet(rows) => Self::rows_to_grades(rows),
            // Backends that cannot answer a SELECT shape report success without rows
            QueryResult::SuccessNoData => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl<C: Connection + 'static> GradeRepository for SqlGradeRepository<C> {
    async fn create_table(&self) -> Result<(), DomainError> {
        self.connection.execute(&Self::create_table_sql()).await?;
        info!(table = GRADES_TABLE, "table ready");
        Ok(())
    }

    async fn find_all(&self, query: Option<&GradesQuery>) -> Result<Vec<Grade>, DomainError> {
        let result = match query.and_then(|q| q.course.as_deref()) {
            Some(course) => {
                self.connection
                    .execute_with_params(&Self::select_by_course_sql(), &[Value::from(course)])
                    .await?
            }
            None => self.connection.execute(&Self::select_all_sql()).await?,
        };

        let grades = Self::expect_rows(result)?;
        debug!(count = grades.len(), "loaded grades");
        Ok(grades)
    }

    async fn save(&self, grade: Grade) -> Result<Grade, DomainError> {
        self.connection
            .execute_with_params(
                &Self::insert_sql(),
                &[Value::from(grade.course.as_str()), Value::Int(grade.grade)],
            )
            .await?;
        debug!(course = %grade.course, grade = grade.grade, "saved grade");
        Ok(grade)
    }

    async fn delete_all(&self) -> Result<(), DomainError> {
        self.connection.execute(&Self::delete_all_sql()).await?;
        debug!("deleted all grades");
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.connection
            .execute_with_params(&Self::delete_by_id_sql(), &[Value::Int(id)])
            .await?;
        debug!(id, "deleted grade");
        Ok(())
    }
}
