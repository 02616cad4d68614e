//! Payment gateway seam: a pluggable checkout backend.
//!
//! The contract mirrors a hosted checkout: the server creates an order, the
//! customer pays against it, and the gateway hands back `paymentId`,
//! `orderId` and an HMAC-SHA256 signature over `orderId|paymentId` that the
//! server verifies with its key secret.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;

type HmacSha256 = Hmac<Sha256>;

pub const CURRENCY_INR: &str = "INR";

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("order amount must be greater than zero")]
    InvalidAmount,

    #[error("unknown order '{0}'")]
    UnknownOrder(String),

    #[error("order '{0}' has already been paid")]
    AlreadyPaid(String),

    #[error("payment signature did not verify for order '{0}'")]
    SignatureMismatch(String),

    #[error("gateway failure: {0}")]
    Gateway(String),
}

impl From<PaymentError> for AppError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::InvalidAmount => AppError::Validation(e.to_string()),
            PaymentError::UnknownOrder(id) => AppError::NotFound(format!("Order {id} not found")),
            PaymentError::AlreadyPaid(id) => {
                AppError::Conflict(format!("Order {id} has already been paid"))
            }
            other => AppError::Payment(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    pub id: String,
    /// Amount in the currency's smallest unit (paise for INR).
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
    pub created_at: DateTime<Utc>,
}

/// What the checkout returns once the customer has paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub payment_id: String,
    pub order_id: String,
    pub signature: String,
}

/// Carried in `AppState` as `Arc<dyn PaymentGateway>`.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_order(
        &self,
        amount: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentOrder, PaymentError>;

    /// Pays an open order. Stands in for the customer-facing checkout dialog.
    async fn checkout(&self, order_id: &str) -> Result<PaymentConfirmation, PaymentError>;

    fn verify(&self, confirmation: &PaymentConfirmation) -> bool;
}

// ────────────────────────────────────────────────────────────────────────────
// MockPaymentGateway
// ────────────────────────────────────────────────────────────────────────────

/// In-process checkout that always succeeds after a configurable delay.
pub struct MockPaymentGateway {
    key_secret: String,
    delay: Duration,
    orders: Mutex<HashMap<String, OrderState>>,
}

#[derive(Debug, Clone)]
struct OrderState {
    order: PaymentOrder,
    paid: bool,
}

impl MockPaymentGateway {
    pub fn new(key_secret: impl Into<String>, delay: Duration) -> Self {
        Self {
            key_secret: key_secret.into(),
            delay,
            orders: Mutex::new(HashMap::new()),
        }
    }

    fn sign(&self, order_id: &str, payment_id: &str) -> Result<String, PaymentError> {
        let mut mac = HmacSha256::new_from_slice(self.key_secret.as_bytes())
            .map_err(|e| PaymentError::Gateway(e.to_string()))?;
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    fn orders(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, OrderState>>, PaymentError> {
        self.orders
            .lock()
            .map_err(|_| PaymentError::Gateway("order book lock poisoned".to_string()))
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_order(
        &self,
        amount: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentOrder, PaymentError> {
        if amount == 0 {
            return Err(PaymentError::InvalidAmount);
        }
        let order = PaymentOrder {
            id: format!("order_{}", Uuid::new_v4().simple()),
            amount,
            currency: currency.to_string(),
            receipt: receipt.to_string(),
            created_at: Utc::now(),
        };
        self.orders()?.insert(
            order.id.clone(),
            OrderState {
                order: order.clone(),
                paid: false,
            },
        );
        debug!("Created order {} for {} {}", order.id, order.amount, order.currency);
        Ok(order)
    }

    async fn checkout(&self, order_id: &str) -> Result<PaymentConfirmation, PaymentError> {
        {
            let orders = self.orders()?;
            let state = orders
                .get(order_id)
                .ok_or_else(|| PaymentError::UnknownOrder(order_id.to_string()))?;
            if state.paid {
                return Err(PaymentError::AlreadyPaid(order_id.to_string()));
            }
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let payment_id = format!("pay_{}", Uuid::new_v4().simple());
        let signature = self.sign(order_id, &payment_id)?;

        let mut orders = self.orders()?;
        let state = orders
            .get_mut(order_id)
            .ok_or_else(|| PaymentError::UnknownOrder(order_id.to_string()))?;
        if state.paid {
            return Err(PaymentError::AlreadyPaid(order_id.to_string()));
        }
        state.paid = true;
        info!(
            "Checkout complete: order {} paid {} {} as {}",
            order_id, state.order.amount, state.order.currency, payment_id
        );

        Ok(PaymentConfirmation {
            payment_id,
            order_id: order_id.to_string(),
            signature,
        })
    }

    fn verify(&self, confirmation: &PaymentConfirmation) -> bool {
        let Ok(expected) = hex::decode(&confirmation.signature) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(self.key_secret.as_bytes()) else {
            return false;
        };
        mac.update(format!("{}|{}", confirmation.order_id, confirmation.payment_id).as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}
