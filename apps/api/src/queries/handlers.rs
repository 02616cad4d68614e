use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::auth::AdminGuard;
use crate::errors::AppError;
use crate::queries::{
    list_queries, resolve_query, submit_query, ContactQuery, NewQuery, QueryListing,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
}

/// POST /api/v1/queries
pub async fn handle_submit_query(
    State(state): State<AppState>,
    Json(req): Json<NewQuery>,
) -> Result<(StatusCode, Json<ContactQuery>), AppError> {
    let query = submit_query(&state.repo, req).await?;
    Ok((StatusCode::CREATED, Json(query)))
}

/// GET /api/v1/admin/queries?search=
pub async fn handle_list_queries(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<QueryListing>, AppError> {
    Ok(Json(list_queries(&state.repo, params.search.as_deref()).await?))
}

/// POST /api/v1/admin/queries/:id/resolve
pub async fn handle_resolve_query(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContactQuery>, AppError> {
    Ok(Json(resolve_query(&state.repo, &id).await?))
}
