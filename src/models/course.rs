use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A course offered at (at most) one campus. Teacher links use the
/// array-of-references model: teacher↔course is many-to-many.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub credit_hours: Option<u32>,
    pub teachers: Vec<Uuid>,
    pub students: Vec<Uuid>,
    pub campus: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Course {
    pub fn taught_by(&self, teacher_id: Uuid) -> bool {
        self.teachers.contains(&teacher_id)
    }
}
