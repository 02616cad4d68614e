use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::auth::{AdminGuard, AuthUser};
use crate::errors::AppError;
use crate::events::EventType;
use crate::registration::wizard::{PersonalInfo, RegistrationDraft};
use crate::registration::{
    advance_draft, complete_registration, create_draft, list_participants, load_draft,
    ParticipantRecord, RegistrationReceipt,
};
use crate::state::AppState;
use crate::upload::MultipartForm;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRegistration {
    pub event_type: String,
}

/// POST /api/v1/registrations
pub async fn handle_start_registration(
    State(state): State<AppState>,
    Json(req): Json<StartRegistration>,
) -> Result<(StatusCode, Json<RegistrationDraft>), AppError> {
    let event_type: EventType = req.event_type.parse()?;
    let draft = create_draft(&state.repo, event_type).await?;
    Ok((StatusCode::CREATED, Json(draft)))
}

/// GET /api/v1/registrations/:id
pub async fn handle_get_registration(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RegistrationDraft>, AppError> {
    Ok(Json(load_draft(&state.repo, &id).await?))
}

/// PUT /api/v1/registrations/:id/personal-info
pub async fn handle_personal_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(info): Json<PersonalInfo>,
) -> Result<Json<RegistrationDraft>, AppError> {
    let draft = advance_draft(&state.repo, &id, |draft| {
        draft.submit_personal_info(info)?;
        Ok(draft.clone())
    })
    .await?;
    Ok(Json(draft))
}

/// POST /api/v1/registrations/:id/submission
///
/// Multipart field `file`. The bytes are discarded once the size is checked.
pub async fn handle_attach_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<RegistrationDraft>, AppError> {
    let mut form = MultipartForm::read(multipart).await?;
    let file = form.take_file("file").map(|f| f.metadata());
    let draft = advance_draft(&state.repo, &id, |draft| {
        draft.attach_submission(file)?;
        Ok(draft.clone())
    })
    .await?;
    Ok(Json(draft))
}

/// POST /api/v1/registrations/:id/payment
pub async fn handle_registration_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: Option<AuthUser>,
) -> Result<Json<RegistrationReceipt>, AppError> {
    let receipt = complete_registration(
        &state.repo,
        state.payments.as_ref(),
        &id,
        auth.as_ref().map(|a| &a.user),
    )
    .await?;
    Ok(Json(receipt))
}

/// GET /api/v1/admin/participants
pub async fn handle_list_participants(
    _admin: AdminGuard,
    State(state): State<AppState>,
) -> Result<Json<Vec<ParticipantRecord>>, AppError> {
    Ok(Json(list_participants(&state.repo).await?))
}
