use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{sessions, AuthUser};
use crate::errors::{join_error, AppError};
use crate::payments::{take_intent, PaymentIntent};
use crate::state::AppState;
use crate::users::{find_by_email, insert_user, normalize_email, UserProfile, UserRecord};
use crate::validation::{require_email, require_phone};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl SignupRequest {
    fn validate(&self) -> Result<(), AppError> {
        let required = [
            &self.full_name,
            &self.email,
            &self.phone_number,
            &self.password,
            &self.confirm_password,
        ];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(AppError::Validation("Please fill in all fields".to_string()));
        }
        require_email(self.email.trim())?;
        require_phone(self.phone_number.trim())?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(
                "Password must be at least 8 characters long".to_string(),
            ));
        }
        if self.password != self.confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Returned by `PUT /payments/intent` before the visitor signed in.
    #[serde(default, rename = "intentId")]
    pub intent_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent: Option<PaymentIntent>,
}

/// POST /api/v1/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    req.validate()?;

    let email = normalize_email(&req.email);
    if find_by_email(&state.repo, &email).await?.is_some() {
        return Err(AppError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let iterations = state.config.password_hash_iterations;
    let password = req.password.clone();
    let credentials = tokio::task::spawn_blocking(move || hash_password(&password, iterations))
        .await
        .map_err(|e| join_error("hash_password", e))?;

    let user = UserRecord {
        full_name: req.full_name.trim().to_string(),
        email: email.clone(),
        phone_number: req.phone_number.trim().to_string(),
        credentials,
        signed_up_at: Utc::now(),
        has_participated: false,
        contestant_id: None,
        age: None,
        address: None,
        city: None,
        state: None,
        pincode: None,
    };
    let profile = UserProfile::from(&user);
    // insert_user re-checks under the write lock.
    insert_user(&state.repo, user).await?;
    let token = sessions::issue(&state.repo, &email).await?;

    info!("New account created for {email}");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: profile,
            payment_intent: None,
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("Please fill in all fields".to_string()));
    }

    let user = find_by_email(&state.repo, &req.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let credentials = user.credentials.clone();
    let password = req.password;
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &credentials))
        .await
        .map_err(|e| join_error("verify_password", e))?;
    if !verified {
        return Err(AppError::InvalidCredentials);
    }

    let token = sessions::issue(&state.repo, &user.email).await?;
    let payment_intent = match req.intent_id.as_deref() {
        Some(id) => take_intent(&state.repo, id).await?,
        None => None,
    };
    info!("{} logged in", user.email);

    Ok(Json(AuthResponse {
        token,
        user: UserProfile::from(&user),
        payment_intent,
    }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    sessions::revoke(&state.repo, &auth.token).await?;
    Ok(StatusCode::NO_CONTENT)
}
