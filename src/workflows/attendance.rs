//! Attendance marking. Records are immutable; a correction is a new record.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::authz::{require_campus_scope, require_course_teacher};
use crate::error::ApiError;
use crate::middleware::Actor;
use crate::models::{AttendanceRecord, Course};
use crate::store::prelude::*;
use crate::types::{AttendanceStatus, Role, SessionSlot};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceInput {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub date: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    pub session: Option<SessionSlot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEntryInput {
    pub student_id: Uuid,
    pub status: AttendanceStatus,
    pub session: Option<SessionSlot>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkMarkInput {
    pub course_id: Uuid,
    pub date: Option<DateTime<Utc>>,
    pub entries: Vec<BulkEntryInput>,
}

/// Resolve the marker's own profile id. Teachers must be assigned to the
/// course; coordinators must own the course's campus.
async fn resolve_marker(
    store: &dyn Store,
    actor: &Actor,
    course: &Course,
) -> Result<Uuid, ApiError> {
    match actor.role {
        Role::Teacher => {
            let teacher = store
                .teacher_by_account(actor.account)
                .await?
                .ok_or_else(|| ApiError::internal("teacher profile missing"))?;
            require_course_teacher(course, teacher.id)?;
            Ok(teacher.id)
        }
        Role::Coordinator => {
            require_campus_scope(actor.role, actor.campus, course.campus)?;
            let coordinator = store
                .coordinator_by_account(actor.account)
                .await?
                .ok_or_else(|| ApiError::internal("coordinator profile missing"))?;
            Ok(coordinator.id)
        }
        _ => Err(ApiError::forbidden("only teachers and coordinators mark attendance")),
    }
}

pub async fn mark(
    store: &dyn Store,
    actor: &Actor,
    input: MarkAttendanceInput,
) -> Result<AttendanceRecord, ApiError> {
    let course = store
        .course(input.course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("course not found"))?;
    if store.student(input.student_id).await?.is_none() {
        return Err(ApiError::not_found("student not found"));
    }
    let marked_by = resolve_marker(store, actor, &course).await?;

    let record = AttendanceRecord {
        id: Uuid::new_v4(),
        student: input.student_id,
        course: course.id,
        date: input.date.unwrap_or_else(Utc::now),
        status: input.status,
        session: input.session,
        marked_by,
        created_at: Utc::now(),
    };
    store.insert_attendance(&record).await?;
    Ok(record)
}

/// Bulk mark for one course on one date. Every student id is verified before
/// the first record is written.
pub async fn mark_bulk(
    store: &dyn Store,
    actor: &Actor,
    input: BulkMarkInput,
) -> Result<Vec<AttendanceRecord>, ApiError> {
    if input.entries.is_empty() {
        return Err(ApiError::validation("entries must not be empty"));
    }
    let course = store
        .course(input.course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("course not found"))?;
    let marked_by = resolve_marker(store, actor, &course).await?;

    let ids: Vec<Uuid> = input.entries.iter().map(|e| e.student_id).collect();
    let found = store.students(&ids).await?;
    let missing: Vec<Uuid> = ids
        .iter()
        .copied()
        .filter(|id| !found.iter().any(|s| s.id == *id))
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::not_found_with(
            "some students do not exist",
            json!({ "missingStudentIds": missing }),
        ));
    }

    let date = input.date.unwrap_or_else(Utc::now);
    let records: Vec<AttendanceRecord> = input
        .entries
        .iter()
        .map(|entry| AttendanceRecord {
            id: Uuid::new_v4(),
            student: entry.student_id,
            course: course.id,
            date,
            status: entry.status,
            session: entry.session,
            marked_by,
            created_at: Utc::now(),
        })
        .collect();
    store.insert_attendance_many(&records).await?;
    Ok(records)
}

/// Course attendance log, newest first.
pub async fn list_by_course(
    store: &dyn Store,
    actor: &Actor,
    course_id: Uuid,
) -> Result<Vec<AttendanceRecord>, ApiError> {
    let course = store
        .course(course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("course not found"))?;
    match actor.role {
        Role::Admin => {}
        Role::Coordinator => require_campus_scope(actor.role, actor.campus, course.campus)?,
        Role::Teacher => {
            let teacher = store
                .teacher_by_account(actor.account)
                .await?
                .ok_or_else(|| ApiError::internal("teacher profile missing"))?;
            require_course_teacher(&course, teacher.id)?;
        }
        Role::Student => return Err(ApiError::forbidden("students cannot view course attendance")),
    }
    Ok(store.attendance_by_course(course_id).await?)
}
