use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{AssessmentType, Role};

/// One per-student row of an assessment batch.
///
/// A batch is the set of rows sharing a `batch_id`; the meta fields
/// (type/title/description/total_marks/date) are repeated on every row and
/// kept identical across the batch. Row identity is the composite key
/// (batch_id, course, student) - a student appears at most once per batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRow {
    pub batch_id: Uuid,
    pub course: Uuid,
    pub student: Uuid,
    #[serde(rename = "type")]
    pub kind: AssessmentType,
    pub title: String,
    pub description: Option<String>,
    pub total_marks: f64,
    pub date: DateTime<Utc>,
    pub marks: f64,
    pub remarks: String,
    /// Teacher profile id when a teacher graded the row.
    pub graded_by: Option<Uuid>,
    pub created_by: Uuid,
    pub created_by_role: Role,
}

impl AssessmentRow {
    /// Composite upsert key.
    pub fn key(&self) -> (Uuid, Uuid, Uuid) {
        (self.batch_id, self.course, self.student)
    }
}
