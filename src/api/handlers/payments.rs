use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{
        ConfirmationStatus, Page, Payment, PaymentStatus, RecordPaymentRequest,
        RegistrationFilter,
    },
    error::{AppError, Result},
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateIntentRequest {
    /// Decimal currency units; converted to minor units for the processor.
    #[validate(range(min = 0.0))]
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct CreateIntentResponse {
    pub id: String,
    #[serde(rename = "clientSecret")]
    pub client_secret: Option<String>,
}

pub async fn create_intent(
    State(state): State<AppState>,
    Json(request): Json<CreateIntentRequest>,
) -> Result<Json<CreateIntentResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let gateway = state
        .payment_gateway
        .as_ref()
        .ok_or_else(|| {
            AppError::ServiceUnavailable("Payment processing is not configured".to_string())
        })?;

    let amount_cents = (request.amount * 100.0).round() as i64;
    let intent = gateway.create_charge_intent(amount_cents).await?;

    Ok(Json(CreateIntentResponse {
        id: intent.id,
        client_secret: intent.client_secret,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SaveHistoryBody {
    #[serde(rename = "paymentData")]
    pub payment_data: RecordPaymentRequest,
}

#[derive(Debug, Serialize)]
pub struct PaymentDto {
    pub id: Uuid,
    pub registration_id: Uuid,
    pub camp_name: String,
    pub email: String,
    pub amount: f64,
    pub payment_method: String,
    pub transaction_id: String,
    pub payment_status: PaymentStatus,
    pub confirmation_status: ConfirmationStatus,
    pub paid_at: DateTime<Utc>,
}

impl From<Payment> for PaymentDto {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id,
            registration_id: payment.registration_id,
            camp_name: payment.camp_name.clone(),
            email: payment.participant_email.clone(),
            amount: payment.amount(),
            payment_method: payment.payment_method.clone(),
            transaction_id: payment.transaction_id.clone(),
            payment_status: payment.payment_status,
            confirmation_status: payment.confirmation_status,
            paid_at: payment.paid_at,
        }
    }
}

/// Records a completed charge: flips the registration to paid and appends
/// the ledger row, atomically.
pub async fn save_history(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<SaveHistoryBody>,
) -> Result<(StatusCode, Json<PaymentDto>)> {
    let mut request = body.payment_data;
    // The ledger is scoped to the identity that paid, never to whatever
    // email the client put in the body.
    request.email = user.email;

    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let payment = state.service_context.payment_repo.record(request).await?;

    tracing::info!(
        "Payment {} recorded for registration {} ({} cents)",
        payment.id,
        payment.registration_id,
        payment.amount_cents
    );

    Ok((StatusCode::CREATED, Json(payment.into())))
}

// Page fields are inlined rather than flattened; serde_urlencoded cannot
// deserialize numbers through #[serde(flatten)].
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    10
}

pub async fn history(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<PaymentDto>>> {
    let filter = RegistrationFilter {
        search: params.search,
    };

    let payments = state
        .service_context
        .payment_repo
        .list_for_participant(
            &user.email,
            &filter,
            Page {
                page: params.page,
                size: params.size,
            },
        )
        .await?;

    Ok(Json(payments.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

pub async fn my_count(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<CountResponse>> {
    let count = state
        .service_context
        .payment_repo
        .count_for_participant(&user.email)
        .await?;

    Ok(Json(CountResponse { count }))
}
