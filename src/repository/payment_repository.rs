use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{
        ConfirmationStatus, Page, Payment, PaymentStatus, RecordPaymentRequest,
        RegistrationFilter,
    },
    error::{AppError, Result},
    repository::PaymentRepository,
};

#[derive(FromRow)]
struct PaymentRow {
    id: String,
    registration_id: String,
    camp_name: String,
    participant_email: String,
    amount_cents: i64,
    payment_method: String,
    transaction_id: String,
    payment_status: String,
    confirmation_status: String,
    paid_at: NaiveDateTime,
}

const PAYMENT_COLUMNS: &str = "id, registration_id, camp_name, \
     participant_email, amount_cents, payment_method, transaction_id, \
     payment_status, confirmation_status, paid_at";

pub struct SqlitePaymentRepository {
    pool: SqlitePool,
}

impl SqlitePaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_payment(row: PaymentRow) -> Result<Payment> {
        Ok(Payment {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            registration_id: Uuid::parse_str(&row.registration_id)
                .map_err(|e| AppError::Database(e.to_string()))?,
            camp_name: row.camp_name,
            participant_email: row.participant_email,
            amount_cents: row.amount_cents,
            payment_method: row.payment_method,
            transaction_id: row.transaction_id,
            payment_status: match row.payment_status.as_str() {
                "unpaid" => PaymentStatus::Unpaid,
                "paid" => PaymentStatus::Paid,
                other => {
                    return Err(AppError::Database(format!(
                        "Invalid payment status: {}",
                        other
                    )))
                }
            },
            confirmation_status: match row.confirmation_status.as_str() {
                "pending" => ConfirmationStatus::Pending,
                "confirmed" => ConfirmationStatus::Confirmed,
                other => {
                    return Err(AppError::Database(format!(
                        "Invalid confirmation status: {}",
                        other
                    )))
                }
            },
            paid_at: DateTime::from_naive_utc_and_offset(row.paid_at, Utc),
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {} FROM payments WHERE id = ?",
            PAYMENT_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_payment(r)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepository {
    async fn record(&self, request: RecordPaymentRequest) -> Result<Payment> {
        let id = Uuid::new_v4();
        let paid_at = Utc::now().naive_utc();

        // Status flip and ledger insert commit together. The flip is an
        // unconditional overwrite, so re-recording the same registration
        // leaves it paid and appends another ledger row.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE registrations SET payment_status = 'paid' WHERE id = ?",
        )
        .bind(request.registration_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::NotFound("Registration not found".to_string()));
        }

        let confirmation = match request.confirmation_status {
            ConfirmationStatus::Pending => "pending",
            ConfirmationStatus::Confirmed => "confirmed",
        };

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, registration_id, camp_name, participant_email,
                amount_cents, payment_method, transaction_id,
                payment_status, confirmation_status, paid_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, 'paid', ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(request.registration_id.to_string())
        .bind(&request.camp_name)
        .bind(&request.email)
        .bind(request.amount)
        .bind(&request.payment_method)
        .bind(&request.transaction_id)
        .bind(confirmation)
        .bind(paid_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve recorded payment".to_string())
        })
    }

    async fn list_for_participant(
        &self,
        participant_email: &str,
        filter: &RegistrationFilter,
        page: Page,
    ) -> Result<Vec<Payment>> {
        let mut sql = format!(
            "SELECT {} FROM payments WHERE participant_email = ?",
            PAYMENT_COLUMNS
        );
        if filter.search.is_some() {
            sql.push_str(" AND camp_name LIKE '%' || ? || '%'");
        }
        sql.push_str(" ORDER BY paid_at DESC, id ASC LIMIT ? OFFSET ?");

        let mut query = sqlx::query_as::<_, PaymentRow>(&sql).bind(participant_email);
        if let Some(search) = &filter.search {
            query = query.bind(search);
        }

        let rows = query
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_payment).collect()
    }

    async fn count_for_participant(&self, participant_email: &str) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM payments WHERE participant_email = ?",
        )
        .bind(participant_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count)
    }
}
