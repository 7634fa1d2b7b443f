//! Database connection abstraction
//!
//! A [`Connection`] accepts SQL text with optional positional parameters and
//! answers either with a result set or with a bare success. Repositories
//! render their SQL against this trait so the backing store can be swapped.

use std::fmt;

use async_trait::async_trait;

use crate::InfrastructureError;

/// A typed SQL parameter or column value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Int(i64),
    Null,
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "'{}'", text),
            Value::Int(value) => write!(f, "{}", value),
            Value::Null => write!(f, "NULL"),
        }
    }
}

/// Rows returned by a query, read through a forward-only cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    titles: Vec<String>,
    rows: Vec<Vec<Value>>,
    cursor: usize,
}

impl ResultSet {
    pub fn new(titles: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            titles,
            rows,
            cursor: 0,
        }
    }

    /// Column titles, in row order
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// Index of the column named `title`
    pub fn column(&self, title: &str) -> Option<usize> {
        self.titles.iter().position(|t| t == title)
    }

    /// Advances the cursor and returns the next row, or `None` once exhausted
    pub fn fetch_next(&mut self) -> Option<&[Value]> {
        let row = self.rows.get(self.cursor)?;
        self.cursor += 1;
        Some(row)
    }

    /// Total number of rows regardless of cursor position
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of executing a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    ResultSet(ResultSet),
    SuccessNoData,
}

impl QueryResult {
    pub fn into_result_set(self) -> Option<ResultSet> {
        match self {
            QueryResult::ResultSet(rows) => Some(rows),
            QueryResult::SuccessNoData => None,
        }
    }
}

/// A connection able to execute SQL statements
#[async_trait]
pub trait Connection: Send + Sync {
    /// Executes a statement without parameters
    async fn execute(&self, query: &str) -> Result<QueryResult, InfrastructureError>;

    /// Executes a statement with positional parameters bound to `?1`, `?2`, ...
    async fn execute_with_params(
        &self,
        query: &str,
        params: &[Value],
    ) -> Result<QueryResult, InfrastructureError>;

    fn is_connected(&self) -> bool;
}
