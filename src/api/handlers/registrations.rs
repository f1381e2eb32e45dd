use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{JoinCampRequest, Page, Registration, RegistrationFilter},
    error::{AppError, Result},
};

// Page fields are inlined rather than flattened; serde_urlencoded cannot
// deserialize numbers through #[serde(flatten)].
#[derive(Debug, Deserialize)]
pub struct PagedSearchQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    10
}

impl PagedSearchQuery {
    fn page(&self) -> Page {
        Page {
            page: self.page,
            size: self.size,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

pub async fn join(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<JoinCampRequest>,
) -> Result<(StatusCode, Json<Registration>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let camp = state
        .service_context
        .camp_repo
        .find_by_id(request.camp_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Camp not found".to_string()))?;

    let registration = state
        .service_context
        .registration_repo
        .join(&camp, &user.email, &request.participant_name)
        .await?;

    tracing::info!(
        "{} joined camp {} (registration {})",
        user.email,
        camp.id,
        registration.id
    );

    Ok((StatusCode::CREATED, Json(registration)))
}

pub async fn list_mine(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PagedSearchQuery>,
) -> Result<Json<Vec<Registration>>> {
    let page = params.page();
    let filter = RegistrationFilter {
        search: params.search,
    };

    let registrations = state
        .service_context
        .registration_repo
        .list_for_participant(&user.email, &filter, page)
        .await?;

    Ok(Json(registrations))
}

pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let decrement = state.settings.registration.decrement_on_cancel;

    state
        .service_context
        .registration_repo
        .delete(id, decrement)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn my_count(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<CountResponse>> {
    let count = state
        .service_context
        .registration_repo
        .count_for_participant(&user.email)
        .await?;

    Ok(Json(CountResponse { count }))
}

#[derive(Debug, Deserialize)]
pub struct IsJoinedQuery {
    #[serde(rename = "campId")]
    pub camp_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct IsJoinedResponse {
    #[serde(rename = "alreadyJoined")]
    pub already_joined: bool,
}

pub async fn is_joined(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<IsJoinedQuery>,
) -> Result<Json<IsJoinedResponse>> {
    let already_joined = state
        .service_context
        .registration_repo
        .is_joined(params.camp_id, &user.email)
        .await?;

    Ok(Json(IsJoinedResponse { already_joined }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Registration>> {
    let registration = state
        .service_context
        .registration_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Registration not found".to_string()))?;

    Ok(Json(registration))
}

/// Registrations against camps the calling admin created. Search matches
/// the participant name here, not the camp name.
pub async fn admin_list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PagedSearchQuery>,
) -> Result<Json<Vec<Registration>>> {
    let page = params.page();
    let filter = RegistrationFilter {
        search: params.search,
    };

    let registrations = state
        .service_context
        .registration_repo
        .list_for_camp_creator(&user.email, &filter, page)
        .await?;

    Ok(Json(registrations))
}

pub async fn admin_count(State(state): State<AppState>) -> Result<Json<CountResponse>> {
    let count = state.service_context.registration_repo.count_all().await?;

    Ok(Json(CountResponse { count }))
}

pub async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Registration>> {
    let registration = state
        .service_context
        .registration_repo
        .confirm(id)
        .await?;

    Ok(Json(registration))
}

/// Admin-side removal, intended for still unpaid/pending registrations.
pub async fn admin_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let decrement = state.settings.registration.decrement_on_cancel;

    state
        .service_context
        .registration_repo
        .delete(id, decrement)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
