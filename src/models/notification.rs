use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{RecipientType, Role};

/// A broadcast notification. `recipient_type` tags the audience; visibility
/// is resolved per reader by the matrix in `authz`, never by a stored
/// recipient list. `schedule` is data only - nothing in this core delivers
/// or times anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient_type: RecipientType,
    pub subject: String,
    pub message: String,
    pub schedule: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    /// Author role captured at creation time; the teacher visibility rule
    /// needs it without a join back to the accounts collection.
    pub created_by_role: Role,
    pub created_at: DateTime<Utc>,
}
