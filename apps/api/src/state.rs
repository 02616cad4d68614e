use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::payments::gateway::{MockPaymentGateway, PaymentGateway};
use crate::storage::{KeyValueStore, Repository};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
    /// Checkout backend. Default: `MockPaymentGateway` signing with `PAYMENT_KEY_SECRET`.
    pub payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    pub fn new(backend: Arc<dyn KeyValueStore>, config: Config) -> Self {
        let payments = MockPaymentGateway::new(
            config.payment_key_secret.clone(),
            Duration::from_millis(config.payment_simulated_delay_ms),
        );
        Self {
            repo: Arc::new(Repository::new(backend)),
            config,
            payments: Arc::new(payments),
        }
    }
}
