use axum::{extract::State, routing::get, Extension, Router};

use crate::authz::require_role;
use crate::error::ApiError;
use crate::middleware::{Actor, ApiResponse, ApiResult};
use crate::models::Student;
use crate::store::prelude::*;
use crate::types::Role;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/student/me", get(me))
}

async fn me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Student> {
    require_role(actor.role, Role::Student)?;
    let student = state
        .store
        .student_by_account(actor.account)
        .await?
        .ok_or_else(|| ApiError::internal("student profile missing"))?;
    Ok(ApiResponse::success(student))
}
