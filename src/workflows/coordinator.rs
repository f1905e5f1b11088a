//! Coordinator surface: everything here is scoped to the coordinator's own
//! campus, resolved once per request from the actor's profile.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::Actor;
use crate::models::{
    AssessmentRow, AttendanceRecord, Campus, Coordinator, Course, Student, Teacher,
};
use crate::store::prelude::*;

use super::admin::{
    apply_student_update, create_teacher_record, CreateTeacherInput, UpdateStudentInput,
    UpdateTeacherInput,
};
use super::{add_member, remove_member};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeInput {
    pub name: Option<String>,
    pub contact_number: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub campus: Campus,
    pub coordinators: Vec<Coordinator>,
    pub student_count: usize,
    pub course_count: usize,
    pub attendance_count: u64,
    pub recent_students: Vec<Student>,
    pub recent_courses: Vec<Course>,
}

/// Resolve the acting coordinator and its campus. A coordinator without a
/// campus has no scope to operate in.
pub async fn resolve_scope(
    store: &dyn Store,
    actor: &Actor,
) -> Result<(Coordinator, Campus), ApiError> {
    let coordinator = store
        .coordinator_by_account(actor.account)
        .await?
        .ok_or_else(|| ApiError::internal("coordinator profile missing"))?;
    let campus_id = coordinator
        .campus
        .ok_or_else(|| ApiError::forbidden("no campus assigned to this coordinator"))?;
    let campus = store
        .campus(campus_id)
        .await?
        .ok_or_else(|| ApiError::not_found("campus not found"))?;
    Ok((coordinator, campus))
}

pub async fn me(store: &dyn Store, actor: &Actor) -> Result<Coordinator, ApiError> {
    store
        .coordinator_by_account(actor.account)
        .await?
        .ok_or_else(|| ApiError::internal("coordinator profile missing"))
}

pub async fn update_me(
    store: &dyn Store,
    actor: &Actor,
    input: UpdateMeInput,
) -> Result<Coordinator, ApiError> {
    let mut coordinator = me(store, actor).await?;
    if let Some(name) = input.name {
        coordinator.name = name;
    }
    if let Some(contact) = input.contact_number {
        coordinator.contact_number = Some(contact);
    }
    store.update_coordinator(&coordinator).await?;
    Ok(coordinator)
}

pub async fn dashboard(store: &dyn Store, actor: &Actor) -> Result<Dashboard, ApiError> {
    let (_, campus) = resolve_scope(store, actor).await?;

    let mut coordinators = Vec::with_capacity(campus.coordinators.len());
    for id in &campus.coordinators {
        if let Some(coordinator) = store.coordinator(*id).await? {
            coordinators.push(coordinator);
        }
    }

    let mut students = store.students_by_campus(campus.id).await?;
    let mut courses = store.courses_by_campus(campus.id).await?;
    let course_ids: Vec<Uuid> = courses.iter().map(|c| c.id).collect();
    let attendance_count = store.count_attendance_by_courses(&course_ids).await?;

    students.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let student_count = students.len();
    let course_count = courses.len();
    students.truncate(5);
    courses.truncate(5);

    Ok(Dashboard {
        campus,
        coordinators,
        student_count,
        course_count,
        attendance_count,
        recent_students: students,
        recent_courses: courses,
    })
}

pub async fn list_students(store: &dyn Store, actor: &Actor) -> Result<Vec<Student>, ApiError> {
    let (_, campus) = resolve_scope(store, actor).await?;
    Ok(store.students_by_campus(campus.id).await?)
}

async fn scoped_student(
    store: &dyn Store,
    campus: &Campus,
    student_id: Uuid,
) -> Result<Student, ApiError> {
    let student = store
        .student(student_id)
        .await?
        .ok_or_else(|| ApiError::not_found("student not found"))?;
    if student.campus != Some(campus.id) {
        return Err(ApiError::forbidden("student is not in your campus"));
    }
    Ok(student)
}

pub async fn get_student(
    store: &dyn Store,
    actor: &Actor,
    student_id: Uuid,
) -> Result<Student, ApiError> {
    let (_, campus) = resolve_scope(store, actor).await?;
    scoped_student(store, &campus, student_id).await
}

pub async fn update_student(
    store: &dyn Store,
    actor: &Actor,
    student_id: Uuid,
    input: UpdateStudentInput,
) -> Result<Student, ApiError> {
    let (_, campus) = resolve_scope(store, actor).await?;
    let mut student = scoped_student(store, &campus, student_id).await?;
    apply_student_update(&mut student, input);
    store.update_student(&student).await?;
    Ok(student)
}

pub async fn list_courses(store: &dyn Store, actor: &Actor) -> Result<Vec<Course>, ApiError> {
    let (_, campus) = resolve_scope(store, actor).await?;
    Ok(store.courses_by_campus(campus.id).await?)
}

async fn scoped_course(
    store: &dyn Store,
    campus: &Campus,
    course_id: Uuid,
) -> Result<Course, ApiError> {
    let course = store
        .course(course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("course not found"))?;
    if course.campus != Some(campus.id) {
        return Err(ApiError::forbidden("course is not in your campus"));
    }
    Ok(course)
}

/// Assign a campus teacher to a campus course. Re-assigning is rejected
/// rather than silently ignored.
pub async fn assign_teacher(
    store: &dyn Store,
    actor: &Actor,
    course_id: Uuid,
    teacher_id: Uuid,
) -> Result<Course, ApiError> {
    let (_, mut campus) = resolve_scope(store, actor).await?;
    let mut course = scoped_course(store, &campus, course_id).await?;
    let mut teacher = store
        .teacher(teacher_id)
        .await?
        .ok_or_else(|| ApiError::not_found("teacher not found"))?;
    if !teacher.campuses.contains(&campus.id) {
        return Err(ApiError::forbidden("teacher does not belong to your campus"));
    }
    if course.taught_by(teacher.id) {
        return Err(ApiError::conflict("teacher is already assigned to this course"));
    }

    add_member(&mut course.teachers, teacher.id);
    store.update_course(&course).await?;
    if add_member(&mut campus.teachers, teacher.id) {
        store.update_campus(&campus).await?;
    }
    if add_member(&mut teacher.campuses, campus.id) {
        store.update_teacher(&teacher).await?;
    }
    Ok(course)
}

/// Remove a teacher from a campus course. If no campus course keeps the
/// teacher, the campus membership link is dropped as well.
pub async fn unassign_teacher(
    store: &dyn Store,
    actor: &Actor,
    course_id: Uuid,
    teacher_id: Uuid,
) -> Result<Course, ApiError> {
    let (_, mut campus) = resolve_scope(store, actor).await?;
    let mut course = scoped_course(store, &campus, course_id).await?;
    if !course.taught_by(teacher_id) {
        return Err(ApiError::not_found("teacher is not assigned to this course"));
    }

    remove_member(&mut course.teachers, teacher_id);
    store.update_course(&course).await?;

    let still_teaching = store
        .courses_by_teacher(teacher_id)
        .await?
        .iter()
        .any(|c| c.campus == Some(campus.id));
    if !still_teaching {
        remove_member(&mut campus.teachers, teacher_id);
        store.update_campus(&campus).await?;
        if let Some(mut teacher) = store.teacher(teacher_id).await? {
            remove_member(&mut teacher.campuses, campus.id);
            store.update_teacher(&teacher).await?;
        }
    }
    Ok(course)
}

/// Register a new teacher pre-bound to the coordinator's campus.
pub async fn register_teacher(
    store: &dyn Store,
    actor: &Actor,
    input: CreateTeacherInput,
) -> Result<Teacher, ApiError> {
    let (coordinator, mut campus) = resolve_scope(store, actor).await?;
    let teacher = create_teacher_record(store, coordinator.account, input, Some(campus.id)).await?;
    if add_member(&mut campus.teachers, teacher.id) {
        store.update_campus(&campus).await?;
    }
    Ok(teacher)
}

pub async fn list_teachers(store: &dyn Store, actor: &Actor) -> Result<Vec<Teacher>, ApiError> {
    let (_, campus) = resolve_scope(store, actor).await?;
    Ok(store.teachers_by_campus(campus.id).await?)
}

async fn scoped_teacher(
    store: &dyn Store,
    campus: &Campus,
    teacher_id: Uuid,
) -> Result<Teacher, ApiError> {
    let teacher = store
        .teacher(teacher_id)
        .await?
        .ok_or_else(|| ApiError::not_found("teacher not found"))?;
    if !teacher.campuses.contains(&campus.id) {
        return Err(ApiError::forbidden("teacher is not in your campus"));
    }
    Ok(teacher)
}

pub async fn get_teacher(
    store: &dyn Store,
    actor: &Actor,
    teacher_id: Uuid,
) -> Result<Teacher, ApiError> {
    let (_, campus) = resolve_scope(store, actor).await?;
    scoped_teacher(store, &campus, teacher_id).await
}

pub async fn update_teacher(
    store: &dyn Store,
    actor: &Actor,
    teacher_id: Uuid,
    input: UpdateTeacherInput,
) -> Result<Teacher, ApiError> {
    let (_, campus) = resolve_scope(store, actor).await?;
    scoped_teacher(store, &campus, teacher_id).await?;
    super::admin::update_teacher(store, teacher_id, input).await
}

pub async fn delete_teacher(
    store: &dyn Store,
    actor: &Actor,
    teacher_id: Uuid,
) -> Result<(), ApiError> {
    let (_, campus) = resolve_scope(store, actor).await?;
    scoped_teacher(store, &campus, teacher_id).await?;
    super::admin::delete_teacher(store, actor, teacher_id).await
}

/// Per-student attendance log, campus-scoped.
pub async fn student_attendance(
    store: &dyn Store,
    actor: &Actor,
    student_id: Uuid,
) -> Result<Vec<AttendanceRecord>, ApiError> {
    let (_, campus) = resolve_scope(store, actor).await?;
    scoped_student(store, &campus, student_id).await?;
    Ok(store.attendance_by_student(student_id).await?)
}

/// Per-student assessment history, campus-scoped.
pub async fn student_assessments(
    store: &dyn Store,
    actor: &Actor,
    student_id: Uuid,
) -> Result<Vec<AssessmentRow>, ApiError> {
    let (_, campus) = resolve_scope(store, actor).await?;
    scoped_student(store, &campus, student_id).await?;
    super::assessments::list_by_student(store, student_id).await
}
