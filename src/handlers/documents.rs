use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::authz::require_role;
use crate::middleware::{Actor, ApiResponse, ApiResult};
use crate::models::Document;
use crate::types::Role;
use crate::workflows::documents::{self, UploadInput, VerifyInput};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents", post(upload))
        .route("/documents/:documentId/verify", patch(verify))
        .route("/documents/student/:studentId", get(list_for_student))
}

async fn upload(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<UploadInput>,
) -> ApiResult<Document> {
    let document = documents::upload(state.store.as_ref(), &actor, input).await?;
    Ok(ApiResponse::created(document))
}

async fn verify(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(document_id): Path<Uuid>,
    Json(input): Json<VerifyInput>,
) -> ApiResult<Document> {
    require_role(actor.role, Role::Admin)?;
    let document = documents::verify(state.store.as_ref(), &actor, document_id, input).await?;
    Ok(ApiResponse::success(document))
}

async fn list_for_student(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(student_id): Path<Uuid>,
) -> ApiResult<Vec<Document>> {
    let docs = documents::list_for_student(state.store.as_ref(), &actor, student_id).await?;
    Ok(ApiResponse::success(docs))
}
