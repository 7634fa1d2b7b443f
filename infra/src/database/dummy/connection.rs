use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use sk_core::domain::entities::Grade;

use crate::database::connection::{Connection, QueryResult, ResultSet, Value};
use crate::InfrastructureError;

/// Column titles of every result set this connection returns
const GRADE_TITLES: [&str; 2] = ["course", "grade"];

/// A mock SQL connection storing grades in process memory.
///
/// Statements are not parsed. The first word of the SQL text selects the
/// behaviour, and anything unrecognised succeeds without touching the data:
///
/// | Statement           | Without params     | With params                          |
/// |---------------------|--------------------|--------------------------------------|
/// | `SELECT * ...`      | all grades         | grades whose course equals `params[0]` |
/// | `INSERT ...`        | no-op              | appends `(Text course, Int grade)`   |
/// | `DELETE ...`        | removes all grades | no-op                                |
///
/// Writers take the lock exclusively, so concurrent requests never observe a
/// partially applied insert or delete.
#[derive(Debug, Default)]
pub struct DummyConnection {
    grades: RwLock<Vec<Grade>>,
}

impl DummyConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a connection pre-populated with `grades`
    pub fn with_grades(grades: Vec<Grade>) -> Self {
        Self {
            grades: RwLock::new(grades),
        }
    }

    fn result_set<'a>(grades: impl Iterator<Item = &'a Grade>) -> QueryResult {
        let rows = grades
            .map(|g| vec![Value::Text(g.course.clone()), Value::Int(g.grade)])
            .collect();
        QueryResult::ResultSet(ResultSet::new(
            GRADE_TITLES.iter().map(|t| t.to_string()).collect(),
            rows,
        ))
    }

    fn components(query: &str) -> Result<Vec<&str>, InfrastructureError> {
        let components: Vec<&str> = query.split_whitespace().collect();
        if components.is_empty() {
            return Err(InfrastructureError::Query {
                message: "empty query".to_string(),
            });
        }
        Ok(components)
    }
}

#[async_trait]
impl Connection for DummyConnection {
    async fn execute(&self, query: &str) -> Result<QueryResult, InfrastructureError> {
        let components = Self::components(query)?;
        debug!(query, "executing statement");

        match components.as_slice() {
            ["SELECT", "*", ..] => {
                let grades = self.grades.read().await;
                Ok(Self::result_set(grades.iter()))
            }
            ["DELETE", ..] => {
                self.grades.write().await.clear();
                Ok(QueryResult::SuccessNoData)
            }
            _ => {
                debug!(query, "statement not supported, ignoring");
                Ok(QueryResult::SuccessNoData)
            }
        }
    }

    async fn execute_with_params(
        &self,
        query: &str,
        params: &[Value],
    ) -> Result<QueryResult, InfrastructureError> {
        let components = Self::components(query)?;
        debug!(query, params = params.len(), "executing statement");

        match (components[0], params) {
            ("INSERT", [Value::Text(course), Value::Int(grade), ..]) => {
                self.grades.write().await.push(Grade::new(course.clone(), *grade));
                Ok(QueryResult::SuccessNoData)
            }
            ("INSERT", _) => {
                warn!(query, "INSERT parameters are not (course, grade), ignoring");
                Ok(QueryResult::SuccessNoData)
            }
            ("SELECT", [Value::Text(course), ..]) => {
                let grades = self.grades.read().await;
                Ok(Self::result_set(grades.iter().filter(|g| &g.course == course)))
            }
            _ => {
                debug!(query, "statement not supported, ignoring");
                Ok(QueryResult::SuccessNoData)
            }
        }
    }

    fn is_connected(&self) -> bool {
        true
    }
}
