use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{CreateFeedbackRequest, Feedback},
    error::{AppError, Result},
};

const RECENT_LIMIT: i64 = 10;

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let feedback = state
        .service_context
        .feedback_repo
        .create(&user.email, request)
        .await?;

    Ok((StatusCode::CREATED, Json(feedback)))
}

pub async fn recent(State(state): State<AppState>) -> Result<Json<Vec<Feedback>>> {
    let feedbacks = state
        .service_context
        .feedback_repo
        .list_recent(RECENT_LIMIT)
        .await?;

    Ok(Json(feedbacks))
}
