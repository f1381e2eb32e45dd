use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Camp {
    pub id: Uuid,
    pub name: String,
    /// Fee in minor currency units (cents).
    pub fee_cents: i64,
    pub date_time: DateTime<Utc>,
    pub location: String,
    pub healthcare_professional: String,
    pub description: String,
    pub image_url: Option<String>,
    /// Derived counter, kept in step with registrations by the join path.
    pub participant_count: i64,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Camp {
    pub fn fee(&self) -> f64 {
        self.fee_cents as f64 / 100.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCampRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0))]
    pub fee_cents: i64,
    pub date_time: DateTime<Utc>,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(length(min = 1))]
    pub healthcare_professional: String,
    pub description: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCampRequest {
    pub name: Option<String>,
    pub fee_cents: Option<i64>,
    pub date_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub healthcare_professional: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Sort keys the frontend sends as display labels. Anything unrecognized
/// falls back to newest-first so listing order is always deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampSort {
    MostRegistered,
    LowestFee,
    Alphabetical,
    Newest,
}

impl CampSort {
    pub fn parse(label: Option<&str>) -> Self {
        match label {
            Some("Most Registered") => CampSort::MostRegistered,
            Some("Camp Fees") => CampSort::LowestFee,
            Some("Alphabetical Order") => CampSort::Alphabetical,
            _ => CampSort::Newest,
        }
    }

    /// ORDER BY clause for the camps table. Primary key is appended as a
    /// tie-breaker so paginated reads never shuffle rows between pages.
    pub fn order_by(&self) -> &'static str {
        match self {
            CampSort::MostRegistered => "participant_count DESC, id ASC",
            CampSort::LowestFee => "fee_cents ASC, id ASC",
            CampSort::Alphabetical => "name COLLATE NOCASE ASC, id ASC",
            CampSort::Newest => "created_at DESC, id ASC",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CampFilter {
    pub search: Option<String>,
    pub sort: CampSort,
    pub created_by: Option<String>,
}

impl Default for CampSort {
    fn default() -> Self {
        CampSort::Newest
    }
}
