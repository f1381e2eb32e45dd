use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    api::state::AppState,
    domain::{CreateUserRequest, UpdateProfileRequest, User},
    error::{AppError, Result},
};

/// Public self-registration. Called by the frontend right after the identity
/// provider hands out a fresh account; second call for the same email is a
/// conflict.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state.service_context.user_repo.create(request).await?;

    tracing::info!("Registered user {}", user.email);

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn role(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<User>> {
    let user = state
        .service_context
        .user_repo
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

pub async fn update_admin_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(update): Json<UpdateProfileRequest>,
) -> Result<Json<User>> {
    let user = state
        .service_context
        .user_repo
        .update_profile(&email, update)
        .await?;

    Ok(Json(user))
}

pub async fn update_participant_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(update): Json<UpdateProfileRequest>,
) -> Result<Json<User>> {
    let user = state
        .service_context
        .user_repo
        .update_profile(&email, update)
        .await?;

    Ok(Json(user))
}
