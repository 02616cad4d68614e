use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::events::EventType;
use crate::state::AppState;
use crate::submissions::{record_submission, submissions_for, NewSubmission, Submission};
use crate::upload::{MultipartForm, MAX_UPLOAD_BYTES};

/// POST /api/v1/submissions
///
/// Multipart fields: `eventType`, `title`, `description`, `paymentId`,
/// `orderId` and one or more `files`.
pub async fn handle_create_submission(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    let mut form = MultipartForm::read(multipart).await?;

    let event_type: EventType = form.require("eventType")?.parse()?;
    let title = form.require("title")?.to_string();
    let description = form.optional("description").unwrap_or_default().to_string();
    let payment_id = form.require("paymentId")?.to_string();
    let order_id = form.require("orderId")?.to_string();

    let files = form.take_files("files");
    if files.is_empty() {
        return Err(AppError::Validation(
            "Please upload at least one file".to_string(),
        ));
    }
    if let Some(big) = files.iter().find(|f| f.size() > MAX_UPLOAD_BYTES) {
        return Err(AppError::Validation(format!(
            "{} is larger than 50MB",
            big.file_name
        )));
    }

    let new = NewSubmission {
        event_type,
        title,
        description,
        payment_id,
        order_id,
        files: files.iter().map(|f| f.metadata()).collect(),
    };
    let submission = record_submission(&state.repo, &auth.user, new).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

/// GET /api/v1/submissions/user
pub async fn handle_user_submissions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Submission>>, AppError> {
    Ok(Json(submissions_for(&state.repo, &auth.user).await?))
}
