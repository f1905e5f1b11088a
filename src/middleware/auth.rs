use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{Json, Response},
};
use uuid::Uuid;

use crate::auth::{validate_jwt, Claims};
use crate::error::ApiError;
use crate::types::Role;

/// Authenticated caller context extracted from the JWT.
#[derive(Clone, Debug)]
pub struct Actor {
    pub account: Uuid,
    pub role: Role,
    pub campus: Option<Uuid>,
}

impl From<Claims> for Actor {
    fn from(claims: Claims) -> Self {
        Self {
            account: claims.sub,
            role: claims.role,
            campus: claims.campus,
        }
    }
}

/// JWT authentication middleware that validates tokens and injects the Actor.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let token = extract_jwt_from_headers(&headers).map_err(unauthorized)?;

    let claims = validate_jwt(&token)
        .map_err(|e| unauthorized(format!("Invalid token: {}", e)))?;

    request.extensions_mut().insert(Actor::from(claims));

    Ok(next.run(request).await)
}

fn unauthorized(msg: impl Into<String>) -> (StatusCode, Json<serde_json::Value>) {
    let api_error = ApiError::unauthorized(msg);
    (StatusCode::UNAUTHORIZED, Json(api_error.to_json()))
}

/// Extract the bearer token from the Authorization header.
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
