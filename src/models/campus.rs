use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A physical/organizational site owning coordinators, teachers, students and
/// courses. The membership vectors are sets: the assignment workflows dedup on
/// insert and keep them consistent with the back-references on the member
/// documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campus {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub coordinators: Vec<Uuid>,
    pub students: Vec<Uuid>,
    pub courses: Vec<Uuid>,
    pub teachers: Vec<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Campus {
    pub fn new(
        name: String,
        location: Option<String>,
        address: Option<String>,
        contact_number: Option<String>,
        created_by: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            location,
            address,
            contact_number,
            coordinators: Vec::new(),
            students: Vec::new(),
            courses: Vec::new(),
            teachers: Vec::new(),
            created_by,
            created_at: Utc::now(),
        }
    }
}
