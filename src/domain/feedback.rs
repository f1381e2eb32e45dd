use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub camp_id: Uuid,
    pub participant_email: String,
    pub participant_name: String,
    pub rating: i64,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    pub camp_id: Uuid,
    #[validate(length(min = 1))]
    pub participant_name: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i64,
    pub comment: String,
}
