use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::events::EventType;
use crate::payments::gateway::{PaymentConfirmation, PaymentOrder, CURRENCY_INR};
use crate::payments::{save_intent, tier_amount_paise, PaymentIntent};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub event_type: String,
    pub number_of_artworks: u32,
}

/// POST /api/v1/payments/create-order
pub async fn handle_create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<PaymentOrder>, AppError> {
    let event_type: EventType = req.event_type.parse()?;
    let amount = tier_amount_paise(event_type, req.number_of_artworks)?;
    let receipt = format!("{}-{}-{}", event_type, req.number_of_artworks, auth.user.email);
    let order = state
        .payments
        .create_order(amount, CURRENCY_INR, &receipt)
        .await?;
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub order_id: String,
}

/// POST /api/v1/payments/checkout
///
/// Pays an open order through the configured gateway and returns the
/// signed confirmation the client then posts to `/verify`.
pub async fn handle_checkout(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<PaymentConfirmation>, AppError> {
    Ok(Json(state.payments.checkout(&req.order_id).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub payment_id: String,
    pub order_id: String,
    pub signature: String,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub number_of_artworks: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub verified: bool,
}

/// POST /api/v1/payments/verify
pub async fn handle_verify_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<VerifyRequest>,
) -> Json<VerifyResponse> {
    let confirmation = PaymentConfirmation {
        payment_id: req.payment_id,
        order_id: req.order_id,
        signature: req.signature,
    };
    let verified = state.payments.verify(&confirmation);
    if verified {
        info!(
            "Payment {} verified for {} ({} x{})",
            confirmation.payment_id,
            auth.user.email,
            req.event_type.as_deref().unwrap_or("-"),
            req.number_of_artworks.unwrap_or(0)
        );
    } else {
        warn!(
            "Payment signature rejected for order {} ({})",
            confirmation.order_id, auth.user.email
        );
    }
    Json(VerifyResponse { verified })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    pub event_type: String,
    pub number_of_artworks: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResponse {
    pub intent_id: String,
}

/// PUT /api/v1/payments/intent
///
/// Anonymous. Remembers what the visitor meant to buy. Login hands it back
/// only to a caller presenting the returned `intentId`.
pub async fn handle_save_intent(
    State(state): State<AppState>,
    Json(req): Json<IntentRequest>,
) -> Result<(StatusCode, Json<IntentResponse>), AppError> {
    let event_type: EventType = req.event_type.parse()?;
    tier_amount_paise(event_type, req.number_of_artworks)?;
    let intent_id = save_intent(
        &state.repo,
        PaymentIntent {
            event_type,
            number_of_artworks: req.number_of_artworks,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(IntentResponse { intent_id })))
}
