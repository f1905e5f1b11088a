use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Role;

/// Authentication account. Exactly one per email; every profile links back to
/// one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    /// Salted credential hash. Persisted, but responses go through
    /// [`AccountView`] so this never reaches the wire.
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub campus: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(email: String, password_hash: String, role: Role, campus: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.trim().to_lowercase(),
            password_hash,
            role,
            is_active: true,
            campus,
            created_at: Utc::now(),
        }
    }
}

/// Client-facing account shape, without the credential hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub campus: Option<Uuid>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            role: account.role,
            is_active: account.is_active,
            campus: account.campus,
        }
    }
}
