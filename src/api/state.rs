use std::sync::Arc;
use crate::{
    auth::IdentityVerifier,
    config::Settings,
    payments::PaymentGateway,
    service::ServiceContext,
};

#[derive(Clone)]
pub struct AppState {
    pub service_context: Arc<ServiceContext>,
    pub identity_verifier: Arc<IdentityVerifier>,
    pub payment_gateway: Option<Arc<dyn PaymentGateway>>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(
        service_context: Arc<ServiceContext>,
        identity_verifier: Arc<IdentityVerifier>,
        payment_gateway: Option<Arc<dyn PaymentGateway>>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            service_context,
            identity_verifier,
            payment_gateway,
            settings,
        }
    }
}
