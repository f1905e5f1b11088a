use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::middleware::{Actor, ApiResponse, ApiResult};
use crate::models::AttendanceRecord;
use crate::workflows::attendance::{self, BulkMarkInput, MarkAttendanceInput};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/attendance", post(mark))
        .route("/attendance/bulk", post(mark_bulk))
        .route("/attendance/course/:courseId", get(list_by_course))
}

async fn mark(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<MarkAttendanceInput>,
) -> ApiResult<AttendanceRecord> {
    let record = attendance::mark(state.store.as_ref(), &actor, input).await?;
    Ok(ApiResponse::created(record))
}

async fn mark_bulk(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<BulkMarkInput>,
) -> ApiResult<Vec<AttendanceRecord>> {
    let records = attendance::mark_bulk(state.store.as_ref(), &actor, input).await?;
    Ok(ApiResponse::created(records))
}

async fn list_by_course(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(course_id): Path<Uuid>,
) -> ApiResult<Vec<AttendanceRecord>> {
    let records = attendance::list_by_course(state.store.as_ref(), &actor, course_id).await?;
    Ok(ApiResponse::success(records))
}
