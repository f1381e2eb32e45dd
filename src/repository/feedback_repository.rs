use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{CreateFeedbackRequest, Feedback},
    error::{AppError, Result},
    repository::FeedbackRepository,
};

#[derive(FromRow)]
struct FeedbackRow {
    id: String,
    camp_id: String,
    participant_email: String,
    participant_name: String,
    rating: i64,
    comment: String,
    created_at: NaiveDateTime,
}

pub struct SqliteFeedbackRepository {
    pool: SqlitePool,
}

impl SqliteFeedbackRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_feedback(row: FeedbackRow) -> Result<Feedback> {
        Ok(Feedback {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            camp_id: Uuid::parse_str(&row.camp_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            participant_email: row.participant_email,
            participant_name: row.participant_name,
            rating: row.rating,
            comment: row.comment,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl FeedbackRepository for SqliteFeedbackRepository {
    async fn create(
        &self,
        participant_email: &str,
        request: CreateFeedbackRequest,
    ) -> Result<Feedback> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO feedbacks (
                id, camp_id, participant_email, participant_name,
                rating, comment, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(request.camp_id.to_string())
        .bind(participant_email)
        .bind(&request.participant_name)
        .bind(request.rating)
        .bind(&request.comment)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let row = sqlx::query_as::<_, FeedbackRow>(
            r#"
            SELECT id, camp_id, participant_email, participant_name,
                   rating, comment, created_at
            FROM feedbacks
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Self::row_to_feedback(row)
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Feedback>> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            r#"
            SELECT id, camp_id, participant_email, participant_name,
                   rating, comment, created_at
            FROM feedbacks
            ORDER BY created_at DESC, id ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_feedback).collect()
    }
}
