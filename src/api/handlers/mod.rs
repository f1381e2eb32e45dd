pub mod root;
pub mod users;
pub mod camps;
pub mod registrations;
pub mod payments;
pub mod feedback;
pub mod analytics;
