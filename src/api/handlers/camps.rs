use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{Camp, CampFilter, CampSort, CreateCampRequest, Page, UpdateCampRequest},
    error::{AppError, Result},
};

const POPULAR_LIMIT: i64 = 6;

#[derive(Debug, Serialize)]
pub struct CampDto {
    pub id: Uuid,
    pub name: String,
    pub fee: f64,
    pub date_time: DateTime<Utc>,
    pub location: String,
    pub healthcare_professional: String,
    pub description: String,
    pub image_url: Option<String>,
    pub participant_count: i64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<Camp> for CampDto {
    fn from(camp: Camp) -> Self {
        Self {
            id: camp.id,
            name: camp.name.clone(),
            fee: camp.fee(),
            date_time: camp.date_time,
            location: camp.location,
            healthcare_professional: camp.healthcare_professional,
            description: camp.description,
            image_url: camp.image_url,
            participant_count: camp.participant_count,
            created_by: camp.created_by,
            created_at: camp.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListCampsQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
}

// Page fields are inlined rather than flattened; serde_urlencoded cannot
// deserialize numbers through #[serde(flatten)].
#[derive(Debug, Deserialize)]
pub struct AdminCampsQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    10
}

pub async fn popular(State(state): State<AppState>) -> Result<Json<Vec<CampDto>>> {
    let camps = state.service_context.camp_repo.popular(POPULAR_LIMIT).await?;

    Ok(Json(camps.into_iter().map(Into::into).collect()))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListCampsQuery>,
) -> Result<Json<Vec<CampDto>>> {
    let filter = CampFilter {
        search: params.search,
        sort: CampSort::parse(params.sort.as_deref()),
        created_by: None,
    };

    let camps = state.service_context.camp_repo.list(&filter, None).await?;

    Ok(Json(camps.into_iter().map(Into::into).collect()))
}

pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CampDto>> {
    let camp = state
        .service_context
        .camp_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Camp not found".to_string()))?;

    Ok(Json(camp.into()))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<CreateCampRequest>,
) -> Result<(StatusCode, Json<CampDto>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let camp = state
        .service_context
        .camp_repo
        .create(&user.email, request)
        .await?;

    tracing::info!("Camp {} created by {}", camp.id, user.email);

    Ok((StatusCode::CREATED, Json(camp.into())))
}

/// Camps the calling admin created, searchable and paginated.
pub async fn admin_list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<AdminCampsQuery>,
) -> Result<Json<Vec<CampDto>>> {
    let filter = CampFilter {
        search: params.search,
        sort: CampSort::Newest,
        created_by: Some(user.email),
    };

    let page = Page {
        page: params.page,
        size: params.size,
    };
    let camps = state
        .service_context
        .camp_repo
        .list(&filter, Some(page))
        .await?;

    Ok(Json(camps.into_iter().map(Into::into).collect()))
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

pub async fn count(State(state): State<AppState>) -> Result<Json<CountResponse>> {
    let count = state.service_context.camp_repo.count().await?;

    Ok(Json(CountResponse { count }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateCampRequest>,
) -> Result<Json<CampDto>> {
    let camp = state.service_context.camp_repo.update(id, update).await?;

    Ok(Json(camp.into()))
}

/// Unconditional delete. Registrations against the camp are left in place;
/// the admin UI is expected to clean those up separately.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.camp_repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
