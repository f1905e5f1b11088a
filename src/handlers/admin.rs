use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::authz::require_role;
use crate::error::ApiError;
use crate::middleware::{Actor, ApiResponse, ApiResult};
use crate::models::{Campus, Coordinator, Course, Student, Teacher};
use crate::store::prelude::*;
use crate::types::Role;
use crate::workflows::admin::{
    self, CreateCampusInput, CreateCoordinatorInput, CreateCourseInput, CreateStudentInput,
    CreateTeacherInput, UpdateCampusInput, UpdateCoordinatorInput, UpdateCourseInput,
    UpdateStudentInput, UpdateTeacherInput,
};
use crate::workflows::assignments::{
    self, AssignCoordinatorInput, AssignCoursesInput, AssignStudentsInput, AssignTeacherInput,
    CoordinatorAssignment, CourseAssignment, StudentAssignment, TeacherAssignment,
};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/campuses", get(list_campuses).post(create_campus))
        .route(
            "/admin/campuses/:id",
            get(get_campus).put(update_campus).delete(delete_campus),
        )
        .route(
            "/admin/coordinators",
            get(list_coordinators).post(create_coordinator),
        )
        .route(
            "/admin/coordinators/:id",
            get(get_coordinator)
                .put(update_coordinator)
                .delete(delete_coordinator),
        )
        .route("/admin/teachers", get(list_teachers).post(create_teacher))
        .route(
            "/admin/teachers/:id",
            get(get_teacher).put(update_teacher).delete(delete_teacher),
        )
        .route("/admin/students", get(list_students).post(create_student))
        .route(
            "/admin/students/:id",
            get(get_student).put(update_student).delete(delete_student),
        )
        .route("/admin/courses", get(list_courses).post(create_course))
        .route(
            "/admin/courses/:id",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/admin/assign/coordinator", post(assign_coordinator))
        .route(
            "/admin/assign/coordinator/:coordinatorId",
            delete(unassign_coordinator),
        )
        .route("/admin/assign/courses", post(assign_courses))
        .route("/admin/assign/teachers", post(assign_teacher))
        .route("/admin/assign/students", post(assign_students))
}

fn admin_only(actor: &Actor) -> Result<(), ApiError> {
    require_role(actor.role, Role::Admin)
}

async fn list_campuses(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<Campus>> {
    admin_only(&actor)?;
    Ok(ApiResponse::success(state.store.list_campuses().await?))
}

async fn create_campus(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<CreateCampusInput>,
) -> ApiResult<Campus> {
    admin_only(&actor)?;
    let campus = admin::create_campus(state.store.as_ref(), &actor, input).await?;
    Ok(ApiResponse::created(campus))
}

async fn get_campus(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Campus> {
    admin_only(&actor)?;
    let campus = state
        .store
        .campus(id)
        .await?
        .ok_or_else(|| ApiError::not_found("campus not found"))?;
    Ok(ApiResponse::success(campus))
}

async fn update_campus(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCampusInput>,
) -> ApiResult<Campus> {
    admin_only(&actor)?;
    let campus = admin::update_campus(state.store.as_ref(), id, input).await?;
    Ok(ApiResponse::success(campus))
}

async fn delete_campus(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    admin_only(&actor)?;
    admin::delete_campus(state.store.as_ref(), id).await?;
    Ok(ApiResponse::success(()))
}

async fn list_coordinators(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<Coordinator>> {
    admin_only(&actor)?;
    Ok(ApiResponse::success(state.store.list_coordinators().await?))
}

async fn create_coordinator(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<CreateCoordinatorInput>,
) -> ApiResult<Coordinator> {
    admin_only(&actor)?;
    let coordinator = admin::create_coordinator(state.store.as_ref(), &actor, input).await?;
    Ok(ApiResponse::created(coordinator))
}

async fn get_coordinator(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Coordinator> {
    admin_only(&actor)?;
    let coordinator = state
        .store
        .coordinator(id)
        .await?
        .ok_or_else(|| ApiError::not_found("coordinator not found"))?;
    Ok(ApiResponse::success(coordinator))
}

async fn update_coordinator(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCoordinatorInput>,
) -> ApiResult<Coordinator> {
    admin_only(&actor)?;
    let coordinator = admin::update_coordinator(state.store.as_ref(), id, input).await?;
    Ok(ApiResponse::success(coordinator))
}

async fn delete_coordinator(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    admin_only(&actor)?;
    admin::delete_coordinator(state.store.as_ref(), &actor, id).await?;
    Ok(ApiResponse::success(()))
}

async fn list_teachers(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<Teacher>> {
    admin_only(&actor)?;
    Ok(ApiResponse::success(state.store.list_teachers().await?))
}

async fn create_teacher(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<CreateTeacherInput>,
) -> ApiResult<Teacher> {
    admin_only(&actor)?;
    let teacher = admin::create_teacher(state.store.as_ref(), &actor, input).await?;
    Ok(ApiResponse::created(teacher))
}

async fn get_teacher(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Teacher> {
    admin_only(&actor)?;
    let teacher = state
        .store
        .teacher(id)
        .await?
        .ok_or_else(|| ApiError::not_found("teacher not found"))?;
    Ok(ApiResponse::success(teacher))
}

async fn update_teacher(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTeacherInput>,
) -> ApiResult<Teacher> {
    admin_only(&actor)?;
    let teacher = admin::update_teacher(state.store.as_ref(), id, input).await?;
    Ok(ApiResponse::success(teacher))
}

async fn delete_teacher(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    admin_only(&actor)?;
    admin::delete_teacher(state.store.as_ref(), &actor, id).await?;
    Ok(ApiResponse::success(()))
}

async fn list_students(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<Student>> {
    admin_only(&actor)?;
    Ok(ApiResponse::success(state.store.list_students().await?))
}

async fn create_student(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<CreateStudentInput>,
) -> ApiResult<Student> {
    admin_only(&actor)?;
    let student = admin::create_student(state.store.as_ref(), &actor, input).await?;
    Ok(ApiResponse::created(student))
}

async fn get_student(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Student> {
    admin_only(&actor)?;
    let student = state
        .store
        .student(id)
        .await?
        .ok_or_else(|| ApiError::not_found("student not found"))?;
    Ok(ApiResponse::success(student))
}

async fn update_student(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateStudentInput>,
) -> ApiResult<Student> {
    admin_only(&actor)?;
    let student = admin::update_student(state.store.as_ref(), id, input).await?;
    Ok(ApiResponse::success(student))
}

async fn delete_student(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    admin_only(&actor)?;
    admin::delete_student(state.store.as_ref(), &actor, id).await?;
    Ok(ApiResponse::success(()))
}

async fn list_courses(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<Course>> {
    admin_only(&actor)?;
    Ok(ApiResponse::success(state.store.list_courses().await?))
}

async fn create_course(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<CreateCourseInput>,
) -> ApiResult<Course> {
    admin_only(&actor)?;
    let course = admin::create_course(state.store.as_ref(), &actor, input).await?;
    Ok(ApiResponse::created(course))
}

async fn get_course(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Course> {
    admin_only(&actor)?;
    let course = state
        .store
        .course(id)
        .await?
        .ok_or_else(|| ApiError::not_found("course not found"))?;
    Ok(ApiResponse::success(course))
}

async fn update_course(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCourseInput>,
) -> ApiResult<Course> {
    admin_only(&actor)?;
    let course = admin::update_course(state.store.as_ref(), id, input).await?;
    Ok(ApiResponse::success(course))
}

async fn delete_course(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    admin_only(&actor)?;
    admin::delete_course(state.store.as_ref(), id).await?;
    Ok(ApiResponse::success(()))
}

async fn assign_coordinator(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<AssignCoordinatorInput>,
) -> ApiResult<CoordinatorAssignment> {
    admin_only(&actor)?;
    let out = assignments::assign_coordinator(state.store.as_ref(), input).await?;
    Ok(ApiResponse::success(out))
}

async fn unassign_coordinator(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(coordinator_id): Path<Uuid>,
) -> ApiResult<Coordinator> {
    admin_only(&actor)?;
    let out = assignments::unassign_coordinator(state.store.as_ref(), coordinator_id).await?;
    Ok(ApiResponse::success(out))
}

async fn assign_courses(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<AssignCoursesInput>,
) -> ApiResult<CourseAssignment> {
    admin_only(&actor)?;
    let out = assignments::assign_courses(state.store.as_ref(), input).await?;
    Ok(ApiResponse::success(out))
}

async fn assign_teacher(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<AssignTeacherInput>,
) -> ApiResult<TeacherAssignment> {
    admin_only(&actor)?;
    let out = assignments::assign_teacher(state.store.as_ref(), input).await?;
    Ok(ApiResponse::success(out))
}

async fn assign_students(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<AssignStudentsInput>,
) -> ApiResult<StudentAssignment> {
    admin_only(&actor)?;
    let out = assignments::assign_students(state.store.as_ref(), input).await?;
    Ok(ApiResponse::success(out))
}
