use axum::{
    extract::{Extension, State},
    Json,
};

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    error::Result,
    service::analytics_service::{AdminAnalytics, ParticipantAnalytics},
};

pub async fn participant(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ParticipantAnalytics>> {
    let analytics = state
        .service_context
        .analytics_service
        .participant_analytics(&user.email)
        .await?;

    Ok(Json(analytics))
}

pub async fn admin(State(state): State<AppState>) -> Result<Json<AdminAnalytics>> {
    let analytics = state
        .service_context
        .analytics_service
        .admin_analytics()
        .await?;

    Ok(Json(analytics))
}
