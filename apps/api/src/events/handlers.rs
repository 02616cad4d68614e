use axum::{extract::Path, Json};

use crate::errors::AppError;
use crate::events::{catalog, event_details, EventDetails, EventSummary, EventType};

/// GET /api/v1/events
pub async fn handle_list_events() -> Json<Vec<EventSummary>> {
    Json(catalog())
}

/// GET /api/v1/events/:event_type
pub async fn handle_get_event(
    Path(event_type): Path<String>,
) -> Result<Json<EventDetails>, AppError> {
    let event_type = EventType::from_path(&event_type)?;
    Ok(Json(event_details(event_type)))
}
