use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};

use crate::auth::AuthUser;
use crate::certificate::certificate_for;
use crate::errors::AppError;
use crate::state::AppState;

/// GET /api/v1/users/certificate
pub async fn handle_download_certificate(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let certificate = certificate_for(&state.repo, &auth.user).await?;
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", certificate.file_name),
        ),
    ];
    Ok((headers, certificate.bytes))
}
