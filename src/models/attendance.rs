use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{AttendanceStatus, SessionSlot};

/// One attendance mark for one student in one course on one date.
/// Records are immutable once created; corrections are new records. Nothing
/// enforces one record per (student, course, date), so callers that need that
/// must de-duplicate themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub student: Uuid,
    pub course: Uuid,
    pub date: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub session: Option<SessionSlot>,
    /// Teacher profile id of whoever marked the record.
    pub marked_by: Uuid,
    pub created_at: DateTime<Utc>,
}
