//! Grade records stored through the mock database

use serde::{Deserialize, Serialize};

/// A course grade, persisted in the `grades` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub course: String,
    pub grade: i64,
}

impl Grade {
    pub fn new(course: impl Into<String>, grade: i64) -> Self {
        Self {
            course: course.into(),
            grade,
        }
    }
}

/// Query parameters accepted when listing grades
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradesQuery {
    /// Restrict the listing to one course
    #[serde(default)]
    pub course: Option<String>,
}
