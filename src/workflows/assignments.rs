//! Multi-entity assignment workflows.
//!
//! All bulk verifications run before any write and fail with the complete
//! missing-id list in `details`. Membership vectors are updated on both
//! sides (campus/course document and the member's back-reference) with dedup
//! inserts, so re-running an assignment is a no-op.

use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{Campus, Coordinator, Course, Student, Teacher};
use crate::store::prelude::*;

use super::{add_member, remove_member};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignCoordinatorInput {
    pub coordinator_id: Uuid,
    pub campus_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignCoursesInput {
    pub campus_id: Uuid,
    pub course_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignTeacherInput {
    pub teacher_id: Uuid,
    pub course_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignStudentsInput {
    pub campus_id: Uuid,
    pub student_ids: Vec<Uuid>,
    #[serde(default)]
    pub course_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinatorAssignment {
    pub coordinator: Coordinator,
    pub campus: Campus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAssignment {
    pub campus: Campus,
    pub assigned_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherAssignment {
    pub teacher: Teacher,
    pub assigned_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAssignment {
    pub campus: Campus,
    pub assigned_count: usize,
}

/// Load every course in `ids`, failing with the full missing list.
async fn require_courses(store: &dyn Store, ids: &[Uuid]) -> Result<Vec<Course>, ApiError> {
    let found = store.courses(ids).await?;
    let missing: Vec<Uuid> = ids
        .iter()
        .copied()
        .filter(|id| !found.iter().any(|c| c.id == *id))
        .collect();
    if missing.is_empty() {
        Ok(found)
    } else {
        Err(ApiError::not_found_with(
            "some courses do not exist",
            json!({ "missingCourseIds": missing }),
        ))
    }
}

async fn require_students(store: &dyn Store, ids: &[Uuid]) -> Result<Vec<Student>, ApiError> {
    let found = store.students(ids).await?;
    let missing: Vec<Uuid> = ids
        .iter()
        .copied()
        .filter(|id| !found.iter().any(|s| s.id == *id))
        .collect();
    if missing.is_empty() {
        Ok(found)
    } else {
        Err(ApiError::not_found_with(
            "some students do not exist",
            json!({ "missingStudentIds": missing }),
        ))
    }
}

async fn require_campus(store: &dyn Store, id: Uuid) -> Result<Campus, ApiError> {
    store
        .campus(id)
        .await?
        .ok_or_else(|| ApiError::not_found("campus not found"))
}

/// Bind a coordinator to a campus. A coordinator already bound elsewhere is
/// moved: the old campus's membership entry is removed first.
pub async fn assign_coordinator(
    store: &dyn Store,
    input: AssignCoordinatorInput,
) -> Result<CoordinatorAssignment, ApiError> {
    let mut coordinator = store
        .coordinator(input.coordinator_id)
        .await?
        .ok_or_else(|| ApiError::not_found("coordinator not found"))?;
    let mut campus = require_campus(store, input.campus_id).await?;

    if let Some(previous) = coordinator.campus {
        if previous != campus.id {
            if let Some(mut old) = store.campus(previous).await? {
                remove_member(&mut old.coordinators, coordinator.id);
                store.update_campus(&old).await?;
            }
        }
    }

    coordinator.campus = Some(campus.id);
    store.update_coordinator(&coordinator).await?;
    set_account_campus(store, coordinator.account, Some(campus.id)).await?;
    if add_member(&mut campus.coordinators, coordinator.id) {
        store.update_campus(&campus).await?;
    }

    Ok(CoordinatorAssignment { coordinator, campus })
}

pub async fn unassign_coordinator(
    store: &dyn Store,
    coordinator_id: Uuid,
) -> Result<Coordinator, ApiError> {
    let mut coordinator = store
        .coordinator(coordinator_id)
        .await?
        .ok_or_else(|| ApiError::not_found("coordinator not found"))?;

    if let Some(campus_id) = coordinator.campus.take() {
        if let Some(mut campus) = store.campus(campus_id).await? {
            remove_member(&mut campus.coordinators, coordinator.id);
            store.update_campus(&campus).await?;
        }
    }
    store.update_coordinator(&coordinator).await?;
    set_account_campus(store, coordinator.account, None).await?;
    Ok(coordinator)
}

/// Attach courses to a campus. Idempotent; a course already at another campus
/// is moved.
pub async fn assign_courses(
    store: &dyn Store,
    input: AssignCoursesInput,
) -> Result<CourseAssignment, ApiError> {
    if input.course_ids.is_empty() {
        return Err(ApiError::validation("courseIds must not be empty"));
    }
    let mut campus = require_campus(store, input.campus_id).await?;
    let courses = require_courses(store, &input.course_ids).await?;

    let mut assigned = 0usize;
    for mut course in courses {
        if let Some(previous) = course.campus {
            if previous != campus.id {
                if let Some(mut old) = store.campus(previous).await? {
                    remove_member(&mut old.courses, course.id);
                    store.update_campus(&old).await?;
                }
            }
        }
        if course.campus != Some(campus.id) {
            course.campus = Some(campus.id);
            store.update_course(&course).await?;
        }
        if add_member(&mut campus.courses, course.id) {
            assigned += 1;
        }
    }
    store.update_campus(&campus).await?;

    Ok(CourseAssignment {
        campus,
        assigned_count: assigned,
    })
}

/// Assign a teacher to courses. The teacher's campus links are recomputed
/// from the owning campuses of the courses, never taken from caller input.
pub async fn assign_teacher(
    store: &dyn Store,
    input: AssignTeacherInput,
) -> Result<TeacherAssignment, ApiError> {
    if input.course_ids.is_empty() {
        return Err(ApiError::validation("courseIds must not be empty"));
    }
    let mut teacher = store
        .teacher(input.teacher_id)
        .await?
        .ok_or_else(|| ApiError::not_found("teacher not found"))?;
    let courses = require_courses(store, &input.course_ids).await?;

    let mut assigned = 0usize;
    let mut derived_campuses: Vec<Uuid> = Vec::new();
    for mut course in courses {
        if add_member(&mut course.teachers, teacher.id) {
            store.update_course(&course).await?;
            assigned += 1;
        }
        if let Some(campus_id) = course.campus {
            add_member(&mut derived_campuses, campus_id);
        }
    }

    let mut teacher_changed = false;
    for campus_id in derived_campuses {
        if add_member(&mut teacher.campuses, campus_id) {
            teacher_changed = true;
        }
        if let Some(mut campus) = store.campus(campus_id).await? {
            if add_member(&mut campus.teachers, teacher.id) {
                store.update_campus(&campus).await?;
            }
        }
    }
    if teacher_changed {
        store.update_teacher(&teacher).await?;
    }

    Ok(TeacherAssignment {
        teacher,
        assigned_count: assigned,
    })
}

/// Place students on a campus, optionally enrolling them into courses. Every
/// id is verified before the first write.
pub async fn assign_students(
    store: &dyn Store,
    input: AssignStudentsInput,
) -> Result<StudentAssignment, ApiError> {
    if input.student_ids.is_empty() {
        return Err(ApiError::validation("studentIds must not be empty"));
    }
    let mut campus = require_campus(store, input.campus_id).await?;
    let students = require_students(store, &input.student_ids).await?;
    let courses = require_courses(store, &input.course_ids).await?;

    let mut assigned = 0usize;
    for mut student in students {
        if let Some(previous) = student.campus {
            if previous != campus.id {
                if let Some(mut old) = store.campus(previous).await? {
                    remove_member(&mut old.students, student.id);
                    store.update_campus(&old).await?;
                }
            }
        }
        student.campus = Some(campus.id);
        for course in &courses {
            add_member(&mut student.courses, course.id);
        }
        store.update_student(&student).await?;
        set_account_campus(store, student.account, Some(campus.id)).await?;
        if add_member(&mut campus.students, student.id) {
            assigned += 1;
        }
    }
    for mut course in courses {
        let mut changed = false;
        for student_id in &input.student_ids {
            changed |= add_member(&mut course.students, *student_id);
        }
        if changed {
            store.update_course(&course).await?;
        }
    }
    store.update_campus(&campus).await?;

    Ok(StudentAssignment {
        campus,
        assigned_count: assigned,
    })
}

async fn set_account_campus(
    store: &dyn Store,
    account_id: Uuid,
    campus: Option<Uuid>,
) -> Result<(), ApiError> {
    if let Some(mut account) = store.account(account_id).await? {
        account.campus = campus;
        store.update_account(&account).await?;
    }
    Ok(())
}
