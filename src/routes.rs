// Route table and router assembly

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::handlers::{auth, users};
use crate::state::AppState;

/// Assemble the application router: the route table, the catch-all, and
/// the global layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/:userId",
            get(users::get).put(users::update).delete(users::remove),
        )
        .fallback(fallback)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "roster-api",
        "version": version,
        "endpoints": {
            "login": "POST /auth/login (public - token acquisition)",
            "list": "GET /users (requires bearer token)",
            "create": "POST /users",
            "show": "GET /users/:userId",
            "update": "PUT /users/:userId",
            "remove": "DELETE /users/:userId",
            "health": "GET /health"
        }
    }))
}

/// GET /health - liveness plus a store connectivity probe
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(err) => {
            tracing::error!("store health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store": "unavailable"
                })),
            )
        }
    }
}

/// Catch-all for paths outside the route table.
async fn fallback() -> ApiError {
    ApiError::not_found("API not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::store::memory::MemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = AppState::new(AppConfig::defaults(), Arc::new(MemoryStore::new()));
        app(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unknown_path_is_a_json_404() {
        let response = test_app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["message"], "API not found");
    }

    #[tokio::test]
    async fn root_reports_the_route_table() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "roster-api");
        assert!(body["endpoints"]["login"].is_string());
    }

    #[tokio::test]
    async fn health_reports_ok_with_memory_store() {
        let response = test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }
}
