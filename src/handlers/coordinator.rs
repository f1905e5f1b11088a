use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::authz::require_role;
use crate::error::ApiError;
use crate::middleware::{Actor, ApiResponse, ApiResult};
use crate::models::{AssessmentRow, AttendanceRecord, Coordinator, Course, Student, Teacher};
use crate::types::Role;
use crate::workflows::admin::{CreateTeacherInput, UpdateStudentInput, UpdateTeacherInput};
use crate::workflows::coordinator::{self, Dashboard, UpdateMeInput};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/coordinator/me", get(me).put(update_me))
        .route("/coordinator/dashboard", get(dashboard))
        .route("/coordinator/students", get(list_students))
        .route(
            "/coordinator/students/:id",
            get(get_student).put(update_student),
        )
        .route("/coordinator/courses", get(list_courses))
        .route(
            "/coordinator/courses/:courseId/assign-teacher/:teacherId",
            post(assign_teacher),
        )
        .route(
            "/coordinator/courses/:courseId/unassign-teacher/:teacherId",
            delete(unassign_teacher),
        )
        .route("/coordinator/attendance/:studentId", get(student_attendance))
        .route(
            "/coordinator/assessments/:studentId",
            get(student_assessments),
        )
        .route(
            "/coordinator/teachers",
            get(list_teachers).post(register_teacher),
        )
        .route(
            "/coordinator/teachers/:id",
            get(get_teacher).put(update_teacher).delete(delete_teacher),
        )
}

fn coordinator_only(actor: &Actor) -> Result<(), ApiError> {
    require_role(actor.role, Role::Coordinator)
}

async fn me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Coordinator> {
    coordinator_only(&actor)?;
    let out = coordinator::me(state.store.as_ref(), &actor).await?;
    Ok(ApiResponse::success(out))
}

async fn update_me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<UpdateMeInput>,
) -> ApiResult<Coordinator> {
    coordinator_only(&actor)?;
    let out = coordinator::update_me(state.store.as_ref(), &actor, input).await?;
    Ok(ApiResponse::success(out))
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Dashboard> {
    coordinator_only(&actor)?;
    let out = coordinator::dashboard(state.store.as_ref(), &actor).await?;
    Ok(ApiResponse::success(out))
}

async fn list_students(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<Student>> {
    coordinator_only(&actor)?;
    let out = coordinator::list_students(state.store.as_ref(), &actor).await?;
    Ok(ApiResponse::success(out))
}

async fn get_student(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Student> {
    coordinator_only(&actor)?;
    let out = coordinator::get_student(state.store.as_ref(), &actor, id).await?;
    Ok(ApiResponse::success(out))
}

async fn update_student(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateStudentInput>,
) -> ApiResult<Student> {
    coordinator_only(&actor)?;
    let out = coordinator::update_student(state.store.as_ref(), &actor, id, input).await?;
    Ok(ApiResponse::success(out))
}

async fn list_courses(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<Course>> {
    coordinator_only(&actor)?;
    let out = coordinator::list_courses(state.store.as_ref(), &actor).await?;
    Ok(ApiResponse::success(out))
}

async fn assign_teacher(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((course_id, teacher_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Course> {
    coordinator_only(&actor)?;
    let out =
        coordinator::assign_teacher(state.store.as_ref(), &actor, course_id, teacher_id).await?;
    Ok(ApiResponse::success(out))
}

async fn unassign_teacher(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((course_id, teacher_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Course> {
    coordinator_only(&actor)?;
    let out =
        coordinator::unassign_teacher(state.store.as_ref(), &actor, course_id, teacher_id).await?;
    Ok(ApiResponse::success(out))
}

async fn student_attendance(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(student_id): Path<Uuid>,
) -> ApiResult<Vec<AttendanceRecord>> {
    coordinator_only(&actor)?;
    let out = coordinator::student_attendance(state.store.as_ref(), &actor, student_id).await?;
    Ok(ApiResponse::success(out))
}

async fn student_assessments(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(student_id): Path<Uuid>,
) -> ApiResult<Vec<AssessmentRow>> {
    coordinator_only(&actor)?;
    let out = coordinator::student_assessments(state.store.as_ref(), &actor, student_id).await?;
    Ok(ApiResponse::success(out))
}

async fn list_teachers(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<Teacher>> {
    coordinator_only(&actor)?;
    let out = coordinator::list_teachers(state.store.as_ref(), &actor).await?;
    Ok(ApiResponse::success(out))
}

async fn register_teacher(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<CreateTeacherInput>,
) -> ApiResult<Teacher> {
    coordinator_only(&actor)?;
    let out = coordinator::register_teacher(state.store.as_ref(), &actor, input).await?;
    Ok(ApiResponse::created(out))
}

async fn get_teacher(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Teacher> {
    coordinator_only(&actor)?;
    let out = coordinator::get_teacher(state.store.as_ref(), &actor, id).await?;
    Ok(ApiResponse::success(out))
}

async fn update_teacher(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTeacherInput>,
) -> ApiResult<Teacher> {
    coordinator_only(&actor)?;
    let out = coordinator::update_teacher(state.store.as_ref(), &actor, id, input).await?;
    Ok(ApiResponse::success(out))
}

async fn delete_teacher(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    coordinator_only(&actor)?;
    coordinator::delete_teacher(state.store.as_ref(), &actor, id).await?;
    Ok(ApiResponse::success(()))
}
