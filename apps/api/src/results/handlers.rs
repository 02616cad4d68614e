use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::AdminGuard;
use crate::errors::{join_error, AppError};
use crate::events::EventType;
use crate::results::import::import_workbook;
use crate::results::models::{EventResult, SearchHit};
use crate::results::store::{find_by_query, find_result, list_results, publish_result};
use crate::results::template::{build_template, template_file_name};
use crate::state::AppState;
use crate::upload::MultipartForm;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateParams {
    pub event_type: String,
}

/// GET /api/v1/results
pub async fn handle_list_results(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResult>>, AppError> {
    Ok(Json(list_results(&state.repo).await?))
}

/// GET /api/v1/results/:event_type/:season
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path((event_type, season)): Path<(String, String)>,
) -> Result<Json<EventResult>, AppError> {
    let event_type = EventType::from_path(&event_type)?;
    find_result(&state.repo, event_type, &season)
        .await?
        .map(Json)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Results for {} season {season} have not been announced yet",
                event_type.title()
            ))
        })
}

/// GET /api/v1/results/search?q=
pub async fn handle_search_results(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    // Blank means nothing to search for; otherwise the query is used as typed.
    if params.q.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter a Contestant ID or Name".to_string(),
        ));
    }
    let results = find_by_query(&state.repo, &params.q).await?;
    Ok(Json(SearchResponse {
        query: params.q,
        total: results.len(),
        results,
    }))
}

/// POST /api/v1/admin/results
pub async fn handle_publish_result(
    _admin: AdminGuard,
    State(state): State<AppState>,
    Json(result): Json<EventResult>,
) -> Result<(StatusCode, Json<EventResult>), AppError> {
    let published = publish_result(&state.repo, result).await?;
    Ok((StatusCode::CREATED, Json(published)))
}

/// POST /api/v1/admin/results/import
///
/// Multipart fields: `eventType`, `season`, `file`. Responds with an
/// unpublished preview; nothing is stored until the admin publishes it.
pub async fn handle_import_results(
    _admin: AdminGuard,
    multipart: Multipart,
) -> Result<Json<EventResult>, AppError> {
    let mut form = MultipartForm::read(multipart).await?;
    let event_type: EventType = form.require("eventType")?.parse()?;
    let season = form.require("season")?.to_string();
    let file = form
        .take_file("file")
        .ok_or_else(|| AppError::Validation("Please select an Excel file".to_string()))?;

    let preview =
        import_workbook(event_type, &season, &file.file_name, file.bytes.to_vec()).await?;
    Ok(Json(preview))
}

/// GET /api/v1/admin/results/template?eventType=
pub async fn handle_download_template(
    _admin: AdminGuard,
    Query(params): Query<TemplateParams>,
) -> Result<impl IntoResponse, AppError> {
    let event_type: EventType = params.event_type.parse()?;
    let bytes = tokio::task::spawn_blocking(move || build_template(event_type))
        .await
        .map_err(|e| join_error("build_template", e))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("template generation failed: {e}")))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        template_file_name(event_type)
    );
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
