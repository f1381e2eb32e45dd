use async_trait::async_trait;
use stripe::{Client, CreatePaymentIntent, Currency, PaymentIntent};

use crate::error::{AppError, Result};

/// An intent reference handed back to the frontend so it can complete the
/// card flow against the processor directly.
#[derive(Debug, Clone)]
pub struct ChargeIntent {
    pub id: String,
    pub client_secret: Option<String>,
}

/// Opaque "charge and return a reference" capability. The processor's own
/// behavior is out of scope; we only need an intent per charge.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_charge_intent(&self, amount_cents: i64) -> Result<ChargeIntent>;
}

pub struct StripeGateway {
    client: Client,
}

impl StripeGateway {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(api_key),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_charge_intent(&self, amount_cents: i64) -> Result<ChargeIntent> {
        let mut params = CreatePaymentIntent::new(amount_cents, Currency::USD);
        params.payment_method_types = Some(vec!["card".to_string()]);

        let intent = PaymentIntent::create(&self.client, params)
            .await
            .map_err(|e| AppError::External(format!("Stripe error: {}", e)))?;

        Ok(ChargeIntent {
            id: intent.id.to_string(),
            client_secret: intent.client_secret,
        })
    }
}

/// In-memory gateway for tests; hands out sequential fake intent ids.
#[cfg(any(test, feature = "test-utils"))]
pub struct FakePaymentGateway {
    counter: std::sync::atomic::AtomicU64,
}

#[cfg(any(test, feature = "test-utils"))]
impl FakePaymentGateway {
    pub fn new() -> Self {
        Self {
            counter: std::sync::atomic::AtomicU64::new(0),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for FakePaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl PaymentGateway for FakePaymentGateway {
    async fn create_charge_intent(&self, amount_cents: i64) -> Result<ChargeIntent> {
        let n = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(ChargeIntent {
            id: format!("pi_fake_{}_{}", n, amount_cents),
            client_secret: Some(format!("pi_fake_{}_secret", n)),
        })
    }
}
