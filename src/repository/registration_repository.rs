use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Camp, ConfirmationStatus, PaymentStatus, Registration, RegistrationFilter, Page},
    error::{AppError, Result},
    repository::RegistrationRepository,
};

#[derive(FromRow)]
struct RegistrationRow {
    id: String,
    camp_id: String,
    camp_name: String,
    camp_fee_cents: i64,
    camp_created_by: String,
    participant_email: String,
    participant_name: String,
    payment_status: String,
    confirmation_status: String,
    created_at: NaiveDateTime,
}

const REGISTRATION_COLUMNS: &str = "id, camp_id, camp_name, camp_fee_cents, \
     camp_created_by, participant_email, participant_name, payment_status, \
     confirmation_status, created_at";

pub struct SqliteRegistrationRepository {
    pool: SqlitePool,
}

impl SqliteRegistrationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_registration(row: RegistrationRow) -> Result<Registration> {
        Ok(Registration {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            camp_id: Uuid::parse_str(&row.camp_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            camp_name: row.camp_name,
            camp_fee_cents: row.camp_fee_cents,
            camp_created_by: row.camp_created_by,
            participant_email: row.participant_email,
            participant_name: row.participant_name,
            payment_status: Self::parse_payment_status(&row.payment_status)?,
            confirmation_status: Self::parse_confirmation_status(&row.confirmation_status)?,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }

    fn parse_payment_status(s: &str) -> Result<PaymentStatus> {
        match s {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "paid" => Ok(PaymentStatus::Paid),
            _ => Err(AppError::Database(format!("Invalid payment status: {}", s))),
        }
    }

    fn parse_confirmation_status(s: &str) -> Result<ConfirmationStatus> {
        match s {
            "pending" => Ok(ConfirmationStatus::Pending),
            "confirmed" => Ok(ConfirmationStatus::Confirmed),
            _ => Err(AppError::Database(format!(
                "Invalid confirmation status: {}",
                s
            ))),
        }
    }
}

#[async_trait]
impl RegistrationRepository for SqliteRegistrationRepository {
    async fn join(
        &self,
        camp: &Camp,
        participant_email: &str,
        participant_name: &str,
    ) -> Result<Registration> {
        let id = Uuid::new_v4();
        let now = Utc::now().naive_utc();

        // Insert and counter bump commit together; a failure of either
        // leaves no half-joined state behind. The increment itself is a
        // single statement, so two concurrent joins never lose an update.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO registrations (
                id, camp_id, camp_name, camp_fee_cents, camp_created_by,
                participant_email, participant_name,
                payment_status, confirmation_status, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, 'unpaid', 'pending', ?)
            "#,
        )
        .bind(id.to_string())
        .bind(camp.id.to_string())
        .bind(&camp.name)
        .bind(camp.fee_cents)
        .bind(&camp.created_by)
        .bind(participant_email)
        .bind(participant_name)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE camps SET participant_count = participant_count + 1 WHERE id = ?",
        )
        .bind(camp.id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            // Camp vanished between the existence check and the join.
            tx.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::NotFound("Camp not found".to_string()));
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created registration".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>> {
        let row = sqlx::query_as::<_, RegistrationRow>(&format!(
            "SELECT {} FROM registrations WHERE id = ?",
            REGISTRATION_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_registration(r)?)),
            None => Ok(None),
        }
    }

    async fn is_joined(&self, camp_id: Uuid, participant_email: &str) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM registrations WHERE camp_id = ? AND participant_email = ?",
        )
        .bind(camp_id.to_string())
        .bind(participant_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    async fn list_for_participant(
        &self,
        participant_email: &str,
        filter: &RegistrationFilter,
        page: Page,
    ) -> Result<Vec<Registration>> {
        let mut sql = format!(
            "SELECT {} FROM registrations WHERE participant_email = ?",
            REGISTRATION_COLUMNS
        );
        if filter.search.is_some() {
            sql.push_str(" AND camp_name LIKE '%' || ? || '%'");
        }
        sql.push_str(" ORDER BY created_at DESC, id ASC LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, RegistrationRow>(&sql).bind(participant_email);
        if let Some(search) = &filter.search {
            query = query.bind(search);
        }

        let rows = query
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_registration).collect()
    }

    async fn count_for_participant(&self, participant_email: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM registrations WHERE participant_email = ?",
        )
        .bind(participant_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    async fn count_unpaid_for_participant(&self, participant_email: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM registrations WHERE participant_email = ? AND payment_status = 'unpaid'",
        )
        .bind(participant_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    async fn list_for_camp_creator(
        &self,
        creator_email: &str,
        filter: &RegistrationFilter,
        page: Page,
    ) -> Result<Vec<Registration>> {
        let mut sql = format!(
            "SELECT {} FROM registrations WHERE camp_created_by = ?",
            REGISTRATION_COLUMNS
        );
        if filter.search.is_some() {
            sql.push_str(" AND participant_name LIKE '%' || ? || '%'");
        }
        sql.push_str(" ORDER BY created_at DESC, id ASC LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, RegistrationRow>(&sql).bind(creator_email);
        if let Some(search) = &filter.search {
            query = query.bind(search);
        }

        let rows = query
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_registration).collect()
    }

    async fn count_all(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM registrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }

    async fn confirm(&self, id: Uuid) -> Result<Registration> {
        let result = sqlx::query(
            "UPDATE registrations SET confirmation_status = 'confirmed' WHERE id = ?",
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Registration not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve confirmed registration".to_string())
        })
    }

    async fn delete(&self, id: Uuid, decrement_counter: bool) -> Result<()> {
        if !decrement_counter {
            sqlx::query("DELETE FROM registrations WHERE id = ?")
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let camp_id = sqlx::query_scalar::<_, String>(
            "SELECT camp_id FROM registrations WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let Some(camp_id) = camp_id else {
            // Nothing to delete; match the no-decrement path and succeed.
            return Ok(());
        };

        sqlx::query("DELETE FROM registrations WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        sqlx::query(
            "UPDATE camps SET participant_count = participant_count - 1 \
             WHERE id = ? AND participant_count > 0",
        )
        .bind(&camp_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
