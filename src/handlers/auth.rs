use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};

use crate::middleware::{Actor, ApiResponse, ApiResult};
use crate::workflows::accounts::{
    self, AuthSuccess, LoginInput, MeOutput, RegisterAdminInput,
};

use super::AppState;

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/admin/register", post(register_admin))
        .route("/auth/login", post(login))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

async fn register_admin(
    State(state): State<AppState>,
    Json(input): Json<RegisterAdminInput>,
) -> ApiResult<AuthSuccess> {
    let out = accounts::register_admin(state.store.as_ref(), input).await?;
    Ok(ApiResponse::created(out))
}

async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> ApiResult<AuthSuccess> {
    let out = accounts::login(state.store.as_ref(), input).await?;
    Ok(ApiResponse::success(out))
}

async fn me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<MeOutput> {
    let out = accounts::me(state.store.as_ref(), &actor).await?;
    Ok(ApiResponse::success(out))
}

/// Stateless tokens have nothing to revoke server-side; this exists so
/// clients have a uniform logout call.
async fn logout() -> ApiResponse<Value> {
    ApiResponse::success(json!({ "message": "logged out" }))
}
