use axum::{
    extract::State,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authz::require_role;
use crate::error::ApiError;
use crate::middleware::{Actor, ApiResponse, ApiResult};
use crate::models::{Course, Student, Teacher};
use crate::store::prelude::*;
use crate::types::Role;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/teacher/me", get(me).put(update_me))
        .route("/teacher/dashboard", get(dashboard))
        .route("/teacher/courses", get(my_courses))
        .route("/teacher/students", get(my_students))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateMeInput {
    name: Option<String>,
    contact_number: Option<String>,
    subject_specialization: Option<String>,
    qualifications: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TeacherDashboard {
    teacher: Teacher,
    course_count: usize,
    student_count: usize,
    campus_count: usize,
    courses: Vec<Course>,
}

async fn resolve_teacher(store: &dyn Store, actor: &Actor) -> Result<Teacher, ApiError> {
    require_role(actor.role, Role::Teacher)?;
    store
        .teacher_by_account(actor.account)
        .await?
        .ok_or_else(|| ApiError::internal("teacher profile missing"))
}

async fn me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Teacher> {
    let teacher = resolve_teacher(state.store.as_ref(), &actor).await?;
    Ok(ApiResponse::success(teacher))
}

async fn update_me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<UpdateMeInput>,
) -> ApiResult<Teacher> {
    let mut teacher = resolve_teacher(state.store.as_ref(), &actor).await?;
    if let Some(name) = input.name {
        teacher.name = name;
    }
    if let Some(contact) = input.contact_number {
        teacher.contact_number = contact;
    }
    if let Some(subject) = input.subject_specialization {
        teacher.subject_specialization = subject;
    }
    if let Some(qualifications) = input.qualifications {
        teacher.qualifications = qualifications;
    }
    state.store.update_teacher(&teacher).await?;
    Ok(ApiResponse::success(teacher))
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<TeacherDashboard> {
    let teacher = resolve_teacher(state.store.as_ref(), &actor).await?;
    let courses = state.store.courses_by_teacher(teacher.id).await?;

    let mut enrolled: Vec<Uuid> = Vec::new();
    for course in &courses {
        for student in &course.students {
            if !enrolled.contains(student) {
                enrolled.push(*student);
            }
        }
    }

    Ok(ApiResponse::success(TeacherDashboard {
        course_count: courses.len(),
        student_count: enrolled.len(),
        campus_count: teacher.campuses.len(),
        courses,
        teacher,
    }))
}

async fn my_courses(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<Course>> {
    let teacher = resolve_teacher(state.store.as_ref(), &actor).await?;
    let courses = state.store.courses_by_teacher(teacher.id).await?;
    Ok(ApiResponse::success(courses))
}

/// Students enrolled in any of the teacher's courses, each listed once.
async fn my_students(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<Student>> {
    let teacher = resolve_teacher(state.store.as_ref(), &actor).await?;
    let courses = state.store.courses_by_teacher(teacher.id).await?;

    let mut ids: Vec<Uuid> = Vec::new();
    for course in &courses {
        for student in &course.students {
            if !ids.contains(student) {
                ids.push(*student);
            }
        }
    }
    let students = state.store.students(&ids).await?;
    Ok(ApiResponse::success(students))
}
