use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::DocumentVerification;

/// Admin profile. Admins are unscoped; the profile only carries contact data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: Uuid,
    pub account: Uuid,
    pub name: String,
    pub contact_number: String,
    pub created_at: DateTime<Utc>,
}

/// Coordinator profile, scoped to at most one campus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinator {
    pub id: Uuid,
    pub account: Uuid,
    pub name: String,
    pub contact_number: Option<String>,
    pub campus: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Teacher profile. A teacher may belong to multiple campuses; the set is
/// derived from course assignments and never trusted from caller input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: Uuid,
    pub account: Uuid,
    pub name: String,
    pub contact_number: String,
    pub subject_specialization: String,
    pub qualifications: String,
    pub campuses: Vec<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Student profile with campus binding and course enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub account: Uuid,
    pub name: String,
    pub cnic: String,
    pub phone: String,
    pub city: Option<String>,
    pub pnc_no: Option<String>,
    pub passport: Option<String>,
    pub qualifications: Option<String>,
    pub campus: Option<Uuid>,
    pub courses: Vec<Uuid>,
    pub document_status: DocumentVerification,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}
