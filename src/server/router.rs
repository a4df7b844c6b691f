//! Route table

use crate::server::handlers::{
    AppState, create_saved_query, delete_saved_query, list_saved_queries,
};
use axum::{
    Json, Router,
    routing::{delete, get},
};
use serde_json::{Value, json};

/// Base path of the saved query resource
pub const SAVED_QUERIES_PATH: &str = "/api/v2/saved-queries";

/// Build saved query routes
///
/// - GET    /api/v2/saved-queries                    - List the caller's saved queries
/// - POST   /api/v2/saved-queries                    - Create a saved query
/// - DELETE /api/v2/saved-queries/{saved_query_id}   - Delete a saved query
pub fn build_saved_query_routes(state: AppState) -> Router {
    Router::new()
        .route(
            SAVED_QUERIES_PATH,
            get(list_saved_queries).post(create_saved_query),
        )
        .route(
            &format!("{}/{{saved_query_id}}", SAVED_QUERIES_PATH),
            delete(delete_saved_query),
        )
        .with_state(state)
}

/// Build health check routes
pub fn build_health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "saved-queries"
    }))
}
