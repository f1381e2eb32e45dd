pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    auth::IdentityVerifier,
    config::Settings,
    payments::PaymentGateway,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    identity_verifier: Arc<IdentityVerifier>,
    payment_gateway: Option<Arc<dyn PaymentGateway>>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, identity_verifier, payment_gateway, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // Public routes: self-registration and browsing
        .route("/userInfo", post(handlers::users::register))
        .route("/popular-camps", get(handlers::camps::popular))
        .route("/ratings", get(handlers::feedback::recent))

        // Routes needing a valid token but no particular role
        .merge(token_routes(app_state.clone()))

        // Role-gated route groups
        .merge(participant_routes(app_state.clone()))
        .merge(admin_routes(app_state.clone()))

        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn token_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/user/role/:email", get(handlers::users::role))
        .route("/create-payment-intent", post(handlers::payments::create_intent))
        .route("/payment/save-history", post(handlers::payments::save_history))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

fn participant_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/all-camps", get(handlers::camps::list))
        .route("/user/camp-details/:id", get(handlers::camps::details))
        .route("/user/join-camp", post(handlers::registrations::join))
        .route("/user/registeredCamps", get(handlers::registrations::list_mine))
        .route("/user/camp-cancel/:id", delete(handlers::registrations::cancel))
        .route("/user/participant-camp-count", get(handlers::registrations::my_count))
        .route("/user/is-joined", get(handlers::registrations::is_joined))
        .route("/user/camp-participant/:id", get(handlers::registrations::get))
        .route("/user/feedback", post(handlers::feedback::create))
        .route("/user/analytics", get(handlers::analytics::participant))
        .route("/participant/updateProfile/:email", patch(handlers::users::update_participant_profile))
        .route("/payment/history", get(handlers::payments::history))
        .route("/payment/participant-payment-count", get(handlers::payments::my_count))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_participant,
        ))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/admin/add-camp", post(handlers::camps::create))
        .route("/admin/get-camps", get(handlers::camps::admin_list))
        .route("/admin/camps/count", get(handlers::camps::count))
        .route("/admin/get-registered-camps", get(handlers::registrations::admin_list))
        .route("/admin/registeredCamp/count", get(handlers::registrations::admin_count))
        .route("/admin/camp-confirm/:id", patch(handlers::registrations::confirm))
        .route("/admin/register-camp-delete/:id", delete(handlers::registrations::admin_delete))
        .route("/admin/campUpdate/:id", patch(handlers::camps::update))
        .route("/admin/deleteCamp/:id", delete(handlers::camps::delete))
        .route("/admin/analytics", get(handlers::analytics::admin))
        .route("/admin/updateProfile/:email", patch(handlers::users::update_admin_profile))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_admin,
        ))
}
