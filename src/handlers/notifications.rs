use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::middleware::{Actor, ApiResponse, ApiResult};
use crate::models::Notification;
use crate::workflows::notifications::{self, CreateNotificationInput};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list).post(create))
        .route("/notifications/:id", get(get_notification))
}

async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<CreateNotificationInput>,
) -> ApiResult<Notification> {
    let out = notifications::create(state.store.as_ref(), &actor, input).await?;
    Ok(ApiResponse::created(out))
}

async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<Notification>> {
    let out = notifications::list(state.store.as_ref(), &actor).await?;
    Ok(ApiResponse::success(out))
}

async fn get_notification(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Notification> {
    let out = notifications::get(state.store.as_ref(), &actor, id).await?;
    Ok(ApiResponse::success(out))
}
