pub mod analytics_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::repository::*;
use analytics_service::AnalyticsService;

/// Explicitly constructed bundle of storage handles, built once at startup
/// and shared by every request handler.
pub struct ServiceContext {
    pub user_repo: Arc<dyn UserRepository>,
    pub camp_repo: Arc<dyn CampRepository>,
    pub registration_repo: Arc<dyn RegistrationRepository>,
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub feedback_repo: Arc<dyn FeedbackRepository>,
    pub analytics_service: Arc<AnalyticsService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        camp_repo: Arc<dyn CampRepository>,
        registration_repo: Arc<dyn RegistrationRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
        feedback_repo: Arc<dyn FeedbackRepository>,
        db_pool: SqlitePool,
    ) -> Self {
        let analytics_service = Arc::new(AnalyticsService::new(db_pool.clone()));

        Self {
            user_repo,
            camp_repo,
            registration_repo,
            payment_repo,
            feedback_repo,
            analytics_service,
            db_pool,
        }
    }

    /// Convenience constructor wiring the SQLite implementations over one
    /// pool. Used by main, the seed binary and the integration tests.
    pub fn with_sqlite(db_pool: SqlitePool) -> Self {
        Self::new(
            Arc::new(SqliteUserRepository::new(db_pool.clone())),
            Arc::new(SqliteCampRepository::new(db_pool.clone())),
            Arc::new(SqliteRegistrationRepository::new(db_pool.clone())),
            Arc::new(SqlitePaymentRepository::new(db_pool.clone())),
            Arc::new(SqliteFeedbackRepository::new(db_pool.clone())),
            db_pool,
        )
    }
}
