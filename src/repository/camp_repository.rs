use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Camp, CampFilter, CreateCampRequest, Page, UpdateCampRequest},
    error::{AppError, Result},
    repository::CampRepository,
};

#[derive(FromRow)]
struct CampRow {
    id: String,
    name: String,
    fee_cents: i64,
    date_time: NaiveDateTime,
    location: String,
    healthcare_professional: String,
    description: String,
    image_url: Option<String>,
    participant_count: i64,
    created_by: String,
    created_at: NaiveDateTime,
}

const CAMP_COLUMNS: &str = "id, name, fee_cents, date_time, location, \
     healthcare_professional, description, image_url, participant_count, \
     created_by, created_at";

pub struct SqliteCampRepository {
    pool: SqlitePool,
}

impl SqliteCampRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_camp(row: CampRow) -> Result<Camp> {
        Ok(Camp {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            name: row.name,
            fee_cents: row.fee_cents,
            date_time: DateTime::from_naive_utc_and_offset(row.date_time, Utc),
            location: row.location,
            healthcare_professional: row.healthcare_professional,
            description: row.description,
            image_url: row.image_url,
            participant_count: row.participant_count,
            created_by: row.created_by,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl CampRepository for SqliteCampRepository {
    async fn create(&self, created_by: &str, request: CreateCampRequest) -> Result<Camp> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO camps (
                id, name, fee_cents, date_time, location,
                healthcare_professional, description, image_url,
                participant_count, created_by, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(&id_str)
        .bind(&request.name)
        .bind(request.fee_cents)
        .bind(request.date_time.naive_utc())
        .bind(&request.location)
        .bind(&request.healthcare_professional)
        .bind(&request.description)
        .bind(&request.image_url)
        .bind(created_by)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created camp".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Camp>> {
        let row = sqlx::query_as::<_, CampRow>(&format!(
            "SELECT {} FROM camps WHERE id = ?",
            CAMP_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_camp(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, filter: &CampFilter, page: Option<Page>) -> Result<Vec<Camp>> {
        // The ORDER BY fragment comes from a fixed enum, never from user
        // input, so assembling the query with format! is safe here.
        let mut sql = format!(
            "SELECT {} FROM camps WHERE 1=1",
            CAMP_COLUMNS
        );
        if filter.search.is_some() {
            sql.push_str(" AND name LIKE '%' || ? || '%'");
        }
        if filter.created_by.is_some() {
            sql.push_str(" AND created_by = ?");
        }
        sql.push_str(&format!(" ORDER BY {}", filter.sort.order_by()));
        if page.is_some() {
            sql.push_str(" LIMIT ? OFFSET ?");
        }

        let mut query = sqlx::query_as::<_, CampRow>(&sql);
        if let Some(search) = &filter.search {
            query = query.bind(search);
        }
        if let Some(created_by) = &filter.created_by {
            query = query.bind(created_by);
        }
        if let Some(page) = page {
            query = query.bind(page.limit()).bind(page.offset());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_camp).collect()
    }

    async fn popular(&self, limit: i64) -> Result<Vec<Camp>> {
        let rows = sqlx::query_as::<_, CampRow>(&format!(
            "SELECT {} FROM camps ORDER BY participant_count DESC, id ASC LIMIT ?",
            CAMP_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_camp).collect()
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM camps")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    async fn update(&self, id: Uuid, update: UpdateCampRequest) -> Result<Camp> {
        let id_str = id.to_string();

        let result = sqlx::query(
            r#"
            UPDATE camps
            SET name = COALESCE(?, name),
                fee_cents = COALESCE(?, fee_cents),
                date_time = COALESCE(?, date_time),
                location = COALESCE(?, location),
                healthcare_professional = COALESCE(?, healthcare_professional),
                description = COALESCE(?, description),
                image_url = COALESCE(?, image_url)
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(update.fee_cents)
        .bind(update.date_time.map(|dt| dt.naive_utc()))
        .bind(&update.location)
        .bind(&update.healthcare_professional)
        .bind(&update.description)
        .bind(&update.image_url)
        .bind(&id_str)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Camp not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated camp".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM camps WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn increment_participant_count(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE camps SET participant_count = participant_count + 1 WHERE id = ?",
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Camp not found".to_string()));
        }

        Ok(())
    }
}
