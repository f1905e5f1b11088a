use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{DocumentStatus, DocumentType};

/// An uploaded student document awaiting verification.
///
/// Lifecycle: created `pending`, then decided (`verified` or `rejected`)
/// exactly once. Re-processing a decided document is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    /// Student profile id of the owner.
    pub student: Uuid,
    pub document_type: DocumentType,
    /// Stored-path reference handed back by the file storage collaborator.
    pub file_path: String,
    pub status: DocumentStatus,
    pub remarks: Option<String>,
    pub verified_by: Option<Uuid>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn is_decided(&self) -> bool {
        self.status != DocumentStatus::Pending
    }
}
