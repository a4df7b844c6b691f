//! HTTP handlers for saved queries
//!
//! Handlers only extract the identity and raw inputs; everything else is
//! delegated to [`SavedQueryService`].

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
};
use crate::core::auth::AuthContext;
use crate::core::error::ApiResult;
use crate::core::pagination::PaginatedResponse;
use crate::core::resource::SavedQuery;
use crate::core::service::{SavedQueryService, parse_create_request};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: SavedQueryService,
}

/// List the caller's saved queries
///
/// GET /api/v2/saved-queries?sort_by=-name&name[~eq]=admin&skip=0&limit=50
pub async fn list_saved_queries(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<PaginatedResponse<SavedQuery>>> {
    let page = state.service.list(auth.owner(), &params).await?;
    Ok(Json(page))
}

/// Create a saved query owned by the caller
///
/// POST /api/v2/saved-queries
pub async fn create_saved_query(
    State(state): State<AppState>,
    auth: AuthContext,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<SavedQuery>)> {
    let request = parse_create_request(&body)?;
    let saved = state.service.create(auth.owner(), request).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

/// Delete one of the caller's saved queries
///
/// DELETE /api/v2/saved-queries/{saved_query_id}
pub async fn delete_saved_query(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(saved_query_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.service.delete(auth.owner(), &saved_query_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
