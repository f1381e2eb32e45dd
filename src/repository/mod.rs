use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::*;
use crate::error::Result;

pub mod user_repository;
pub mod camp_repository;
pub mod registration_repository;
pub mod payment_repository;
pub mod feedback_repository;

pub use user_repository::SqliteUserRepository;
pub use camp_repository::SqliteCampRepository;
pub use registration_repository::SqliteRegistrationRepository;
pub use payment_repository::SqlitePaymentRepository;
pub use feedback_repository::SqliteFeedbackRepository;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    async fn create(&self, request: CreateUserRequest) -> Result<User>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update_profile(&self, email: &str, update: UpdateProfileRequest) -> Result<User>;
}

#[async_trait]
pub trait CampRepository: Send + Sync {
    async fn create(&self, created_by: &str, request: CreateCampRequest) -> Result<Camp>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Camp>>;
    async fn list(&self, filter: &CampFilter, page: Option<Page>) -> Result<Vec<Camp>>;
    async fn popular(&self, limit: i64) -> Result<Vec<Camp>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, id: Uuid, update: UpdateCampRequest) -> Result<Camp>;
    /// Unconditional; registrations pointing at the camp are left in place.
    async fn delete(&self, id: Uuid) -> Result<()>;
    /// Single-statement counter bump, safe under concurrent joins.
    async fn increment_participant_count(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Inserts the registration (always unpaid/pending) and bumps the camp's
    /// participant counter in one transaction.
    async fn join(
        &self,
        camp: &Camp,
        participant_email: &str,
        participant_name: &str,
    ) -> Result<Registration>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>>;
    async fn is_joined(&self, camp_id: Uuid, participant_email: &str) -> Result<bool>;
    async fn list_for_participant(
        &self,
        participant_email: &str,
        filter: &RegistrationFilter,
        page: Page,
    ) -> Result<Vec<Registration>>;
    async fn count_for_participant(&self, participant_email: &str) -> Result<i64>;
    async fn count_unpaid_for_participant(&self, participant_email: &str) -> Result<i64>;
    /// Registrations against camps the given admin created.
    async fn list_for_camp_creator(
        &self,
        creator_email: &str,
        filter: &RegistrationFilter,
        page: Page,
    ) -> Result<Vec<Registration>>;
    async fn count_all(&self) -> Result<i64>;
    /// Idempotent; confirming an already-confirmed registration succeeds.
    async fn confirm(&self, id: Uuid) -> Result<Registration>;
    /// Removes the registration. The camp counter is only decremented when
    /// `decrement_counter` is set; the default deployment leaves it alone
    /// and accepts the drift.
    async fn delete(&self, id: Uuid, decrement_counter: bool) -> Result<()>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Flips the registration to paid and appends the ledger row in one
    /// transaction. The status flip is idempotent-by-overwrite; the ledger
    /// insert is not, so calling twice produces two rows.
    async fn record(&self, request: RecordPaymentRequest) -> Result<Payment>;
    async fn list_for_participant(
        &self,
        participant_email: &str,
        filter: &RegistrationFilter,
        page: Page,
    ) -> Result<Vec<Payment>>;
    async fn count_for_participant(&self, participant_email: &str) -> Result<i64>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn create(&self, participant_email: &str, request: CreateFeedbackRequest) -> Result<Feedback>;
    async fn list_recent(&self, limit: i64) -> Result<Vec<Feedback>>;
}
