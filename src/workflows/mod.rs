//! Multi-entity business workflows.
//!
//! Handlers stay thin; everything that touches more than one record, or that
//! has a compensating-action story, lives here. Every function takes the
//! store as `&dyn Store` so the integration tests can drive the same code
//! against the in-memory backend.

pub mod accounts;
pub mod admin;
pub mod assessments;
pub mod assignments;
pub mod attendance;
pub mod coordinator;
pub mod documents;
pub mod lesson_plans;
pub mod notifications;

use serde::Serialize;

use crate::error::ApiError;
use crate::store::StoreError;

/// Serialize a profile into the response envelope, surfacing failures as the
/// store's serialization error so they map to 500 uniformly.
pub(crate) fn to_value<T: Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    Ok(serde_json::to_value(value).map_err(StoreError::Serialization)?)
}

/// Dedup insert for the membership vectors on campus/course documents.
pub(crate) fn add_member(set: &mut Vec<uuid::Uuid>, id: uuid::Uuid) -> bool {
    if set.contains(&id) {
        false
    } else {
        set.push(id);
        true
    }
}

pub(crate) fn remove_member(set: &mut Vec<uuid::Uuid>, id: uuid::Uuid) {
    set.retain(|m| *m != id);
}
