use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::registration::{ConfirmationStatus, PaymentStatus};

/// Append-only ledger row, one per successful charge. Never updated.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub registration_id: Uuid,
    pub camp_name: String,
    pub participant_email: String,
    /// Minor currency units, exactly what the processor charged.
    pub amount_cents: i64,
    pub payment_method: String,
    /// Charge reference assigned by the external processor.
    pub transaction_id: String,
    pub payment_status: PaymentStatus,
    pub confirmation_status: ConfirmationStatus,
    pub paid_at: DateTime<Utc>,
}

impl Payment {
    /// Amount in decimal currency units, as shown to users.
    pub fn amount(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    pub registration_id: Uuid,
    #[validate(length(min = 1))]
    pub camp_name: String,
    #[validate(email)]
    pub email: String,
    /// Minor units, straight from the processor's charge object.
    #[validate(range(min = 0))]
    pub amount: i64,
    #[validate(length(min = 1))]
    pub payment_method: String,
    #[validate(length(min = 1))]
    pub transaction_id: String,
    pub confirmation_status: ConfirmationStatus,
}
