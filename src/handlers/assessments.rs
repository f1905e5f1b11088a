use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::{Actor, ApiResponse, ApiResult};
use crate::workflows::assessments::{
    self, BatchDetail, BatchSummary, UpdateMarksInput, UpdateMetaInput, UpsertBatchInput,
};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/assessments", post(upsert_batch))
        .route("/assessments/course/:courseId", get(list_by_course))
        .route(
            "/assessments/:batchId",
            get(get_batch).patch(update_meta).delete(delete_batch),
        )
        .route("/assessments/:batchId/marks", axum::routing::put(update_marks))
        .route(
            "/assessments/:batchId/student/:studentId",
            delete(delete_row),
        )
}

/// 201 when the batch id was generated here, 200 when the caller supplied it.
async fn upsert_batch(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<UpsertBatchInput>,
) -> ApiResult<BatchDetail> {
    let outcome = assessments::upsert_batch(state.store.as_ref(), &actor, input).await?;
    if outcome.created {
        Ok(ApiResponse::created(outcome.detail))
    } else {
        Ok(ApiResponse::success(outcome.detail))
    }
}

async fn list_by_course(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(course_id): Path<Uuid>,
) -> ApiResult<Vec<BatchSummary>> {
    let out = assessments::list_batches_by_course(state.store.as_ref(), &actor, course_id).await?;
    Ok(ApiResponse::success(out))
}

async fn get_batch(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(batch_id): Path<Uuid>,
) -> ApiResult<BatchDetail> {
    let out = assessments::get_batch(state.store.as_ref(), &actor, batch_id).await?;
    Ok(ApiResponse::success(out))
}

async fn update_meta(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<UpdateMetaInput>,
) -> ApiResult<BatchDetail> {
    let out = assessments::update_batch_meta(state.store.as_ref(), &actor, batch_id, input).await?;
    Ok(ApiResponse::success(out))
}

async fn update_marks(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<UpdateMarksInput>,
) -> ApiResult<BatchDetail> {
    let out =
        assessments::update_batch_marks(state.store.as_ref(), &actor, batch_id, input).await?;
    Ok(ApiResponse::success(out))
}

async fn delete_batch(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(batch_id): Path<Uuid>,
) -> ApiResult<Value> {
    let deleted = assessments::delete_batch(state.store.as_ref(), &actor, batch_id).await?;
    Ok(ApiResponse::success(json!({ "deletedCount": deleted })))
}

async fn delete_row(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path((batch_id, student_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Value> {
    let remaining =
        assessments::delete_row(state.store.as_ref(), &actor, batch_id, student_id).await?;
    Ok(ApiResponse::success(json!({ "remainingCount": remaining })))
}
