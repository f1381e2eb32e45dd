use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Join record linking a participant to a camp. Camp name, fee and creator
/// are snapshotted at join time so admin listings and payment rows survive
/// later camp edits.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub camp_id: Uuid,
    pub camp_name: String,
    pub camp_fee_cents: i64,
    pub camp_created_by: String,
    pub participant_email: String,
    pub participant_name: String,
    pub payment_status: PaymentStatus,
    pub confirmation_status: ConfirmationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ConfirmationStatus {
    Pending,
    Confirmed,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JoinCampRequest {
    pub camp_id: Uuid,
    #[validate(length(min = 1))]
    pub participant_name: String,
}

/// Filter for the registration listings. Search matches case-insensitively
/// against the camp name (participant view) or the participant name
/// (admin view).
#[derive(Debug, Clone, Default)]
pub struct RegistrationFilter {
    pub search: Option<String>,
}
