use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{Actor, ApiResponse, ApiResult};
use crate::models::LessonPlan;
use crate::types::Role;
use crate::workflows::lesson_plans::{
    self, CreatePlanInput, PageQuery, PlanPage, UpdatePlanInput,
};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/lesson-plans", get(list).post(create))
        .route("/lesson-plans/search", get(search))
        .route(
            "/lesson-plans/:id",
            get(get_plan).put(update).delete(soft_delete),
        )
        .route("/lesson-plans/:id/duplicate", post(duplicate))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

fn staff_only(actor: &Actor) -> Result<(), ApiError> {
    if actor.role == Role::Student {
        Err(ApiError::forbidden("students cannot manage lesson plans"))
    } else {
        Ok(())
    }
}

async fn create(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<CreatePlanInput>,
) -> ApiResult<LessonPlan> {
    staff_only(&actor)?;
    let plan = lesson_plans::create(state.store.as_ref(), &actor, input).await?;
    Ok(ApiResponse::created(plan))
}

async fn list(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<PageQuery>,
) -> ApiResult<PlanPage> {
    staff_only(&actor)?;
    let page = lesson_plans::list(state.store.as_ref(), &actor, query).await?;
    Ok(ApiResponse::success(page))
}

async fn search(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<LessonPlan>> {
    staff_only(&actor)?;
    let q = query.q.unwrap_or_default();
    let plans = lesson_plans::search(state.store.as_ref(), &actor, &q).await?;
    Ok(ApiResponse::success(plans))
}

async fn get_plan(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<LessonPlan> {
    staff_only(&actor)?;
    let plan = lesson_plans::get(state.store.as_ref(), &actor, id).await?;
    Ok(ApiResponse::success(plan))
}

async fn update(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdatePlanInput>,
) -> ApiResult<LessonPlan> {
    staff_only(&actor)?;
    let plan = lesson_plans::update(state.store.as_ref(), &actor, id, input).await?;
    Ok(ApiResponse::success(plan))
}

async fn soft_delete(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    staff_only(&actor)?;
    lesson_plans::soft_delete(state.store.as_ref(), &actor, id).await?;
    Ok(ApiResponse::success(()))
}

async fn duplicate(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<LessonPlan> {
    staff_only(&actor)?;
    let plan = lesson_plans::duplicate(state.store.as_ref(), &actor, id).await?;
    Ok(ApiResponse::created(plan))
}
