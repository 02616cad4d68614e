use axum::{extract::State, Json};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;
use crate::users::{dashboard_for, update_user, Dashboard, ProfileUpdate, UserProfile};

/// GET /api/v1/users/profile
pub async fn handle_get_profile(auth: AuthUser) -> Json<UserProfile> {
    Json(UserProfile::from(&auth.user))
}

/// PUT /api/v1/users/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, AppError> {
    let updated = update_user(&state.repo, &auth.user.email, |user| update.apply(user)).await?;
    Ok(Json(UserProfile::from(&updated)))
}

/// GET /api/v1/users/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Dashboard>, AppError> {
    Ok(Json(dashboard_for(&state.repo, &auth.user).await?))
}
