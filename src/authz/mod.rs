//! Role and scope checks shared by the handlers and workflows.
//!
//! Everything here is a pure function over already-loaded records so the
//! decisions are easy to test without a store. Out-of-scope access is
//! reported as Forbidden; NotFound is reserved for ids that do not resolve
//! at all.

use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Course, Notification};
use crate::types::{RecipientType, Role};

pub fn require_role(actual: Role, expected: Role) -> Result<(), ApiError> {
    if actual == expected {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "{expected} access required"
        )))
    }
}

/// Campus-scoped reads and writes: admins see everything, coordinators only
/// their own campus.
pub fn require_campus_scope(
    role: Role,
    actor_campus: Option<Uuid>,
    target_campus: Option<Uuid>,
) -> Result<(), ApiError> {
    if role == Role::Admin {
        return Ok(());
    }
    match (actor_campus, target_campus) {
        (Some(a), Some(t)) if a == t => Ok(()),
        _ => Err(ApiError::forbidden("not in your campus")),
    }
}

/// Teachers may only touch courses they are assigned to.
pub fn require_course_teacher(course: &Course, teacher: Uuid) -> Result<(), ApiError> {
    if course.taught_by(teacher) {
        Ok(())
    } else {
        Err(ApiError::forbidden("you are not assigned to this course"))
    }
}

pub fn creatable_audiences(role: Role) -> &'static [RecipientType] {
    match role {
        Role::Admin => &[
            RecipientType::Admin,
            RecipientType::Principals,
            RecipientType::Teachers,
            RecipientType::Both,
            RecipientType::All,
        ],
        Role::Coordinator => &[
            RecipientType::Principals,
            RecipientType::Teachers,
            RecipientType::Both,
            RecipientType::All,
        ],
        Role::Teacher => &[
            RecipientType::Principals,
            RecipientType::Admin,
            RecipientType::Both,
        ],
        Role::Student => &[],
    }
}

pub fn can_create_notification(role: Role, recipient: RecipientType) -> bool {
    creatable_audiences(role).contains(&recipient)
}

/// Read visibility. Teachers always see what they authored, plus broadcasts
/// to teachers/both/all sent from above them; a broadcast authored by a peer
/// teacher stays invisible.
pub fn can_view_notification(role: Role, actor_account: Uuid, n: &Notification) -> bool {
    match role {
        Role::Admin => true,
        Role::Coordinator => matches!(
            n.recipient_type,
            RecipientType::Principals
                | RecipientType::Teachers
                | RecipientType::Both
                | RecipientType::All
        ),
        Role::Teacher => {
            n.created_by == actor_account
                || (matches!(
                    n.recipient_type,
                    RecipientType::Teachers | RecipientType::Both | RecipientType::All
                ) && matches!(n.created_by_role, Role::Admin | Role::Coordinator))
        }
        Role::Student => matches!(n.recipient_type, RecipientType::All),
    }
}
