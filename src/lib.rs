pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;

/// Build the application router: public liveness routes, the protected
/// task and profile groups, and the admin group behind the role gate.
pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Protected API
        .merge(task_routes())
        .merge(account_routes())
        .merge(admin_routes())
        .fallback(unknown_route)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn task_routes() -> Router {
    use handlers::tasks;

    Router::new()
        .route(
            "/api/v1/tasks",
            get(tasks::list_tasks).post(tasks::create_task),
        )
        .route(
            "/api/v1/tasks/:id",
            get(tasks::get_task)
                .patch(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(middleware::authenticate))
                .layer(from_fn(middleware::resolve_account)),
        )
}

fn account_routes() -> Router {
    use handlers::account;

    Router::new()
        .route(
            "/api/v1/users/me",
            get(account::get_me)
                .patch(account::update_me)
                .delete(account::delete_me),
        )
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(middleware::authenticate))
                .layer(from_fn(middleware::resolve_account)),
        )
}

fn admin_routes() -> Router {
    use axum::routing::patch;
    use handlers::admin;

    Router::new()
        .route("/api/v1/admin/users", get(admin::list_users))
        .route(
            "/api/v1/admin/users/:id",
            patch(admin::update_user).delete(admin::delete_user),
        )
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(middleware::authenticate))
                .layer(from_fn(middleware::resolve_account))
                .layer(from_fn(middleware::require_admin)),
        )
}

async fn root() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    match database::DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "error",
                    "message": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}

async fn unknown_route(uri: axum::http::Uri) -> ApiError {
    ApiError::not_found(format!("Can't find {} on this server", uri.path()))
}
