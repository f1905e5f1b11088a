use std::sync::Arc;

use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use campus_api::handlers::{self, AppState};
use campus_api::middleware::jwt_auth_middleware;
use campus_api::store::PostgresStore;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campus_api=info,tower_http=info".into()),
        )
        .init();

    let config = campus_api::config::config();
    tracing::info!("starting campus-api in {:?} mode", config.environment);

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let store = PostgresStore::connect(&database_url)
        .await
        .expect("database connection");
    store.migrate().await.expect("database migration");

    let state = AppState::new(Arc::new(store));
    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("CAMPUS_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("campus-api listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(handlers::auth::protected_routes())
        .merge(handlers::admin::routes())
        .merge(handlers::coordinator::routes())
        .merge(handlers::teacher::routes())
        .merge(handlers::student::routes())
        .merge(handlers::attendance::routes())
        .merge(handlers::assessments::routes())
        .merge(handlers::documents::routes())
        .merge(handlers::lesson_plans::routes())
        .merge(handlers::notifications::routes())
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware));

    let api = Router::new()
        .merge(handlers::auth::public_routes())
        .merge(protected);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Campus API",
            "version": version,
            "description": "Multi-campus school administration backend",
            "endpoints": {
                "auth": "/api/v1/auth/* (register/login public, me/logout protected)",
                "admin": "/api/v1/admin/* (admin)",
                "coordinator": "/api/v1/coordinator/* (coordinator)",
                "teacher": "/api/v1/teacher/* (teacher)",
                "student": "/api/v1/student/me (student)",
                "attendance": "/api/v1/attendance/*",
                "assessments": "/api/v1/assessments/*",
                "documents": "/api/v1/documents/*",
                "lesson_plans": "/api/v1/lesson-plans/*",
                "notifications": "/api/v1/notifications/*",
            }
        }
    }))
}

async fn health() -> axum::response::Json<Value> {
    axum::response::Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now()
        }
    }))
}
