use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::{AppError, Result};

/// Read-side aggregate metrics. Two fixed windows: this month
/// `[start of current month, now)` and last month
/// `[start of previous month, start of current month)`.
pub struct AnalyticsService {
    pool: SqlitePool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAnalytics {
    pub total_participants: i64,
    pub participant_change: f64,
    pub total_camps: i64,
    pub camp_change: f64,
    pub total_paid_payments: i64,
    pub paid_payment_change: f64,
    pub total_pending_payments: i64,
    pub total_revenue: f64,
    pub revenue_change: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantAnalytics {
    pub total_joined_camps: i64,
    pub total_paid_payments: i64,
    pub total_pending_payments: i64,
    pub total_paid_amount: f64,
}

/// Month-over-month percentage delta, rounded to 2 decimal places.
/// A zero baseline maps to 100 when anything happened this month, else 0.
pub fn calculate_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    round2((current - previous) / previous * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn month_start(date: NaiveDate) -> NaiveDateTime {
    date.with_day(1)
        .expect("day 1 always exists")
        .and_hms_opt(0, 0, 0)
        .expect("midnight always exists")
}

impl AnalyticsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn admin_analytics(&self) -> Result<AdminAnalytics> {
        let now = Utc::now().naive_utc();
        let this_month = month_start(now.date());
        let last_month = month_start(
            now.date()
                .checked_sub_months(Months::new(1))
                .unwrap_or(now.date()),
        );

        let total_participants = self
            .count("SELECT COUNT(*) FROM users WHERE role = 'participant'", &[])
            .await?;
        let this_month_participants = self
            .count(
                "SELECT COUNT(*) FROM users WHERE role = 'participant' \
                 AND created_at >= ? AND created_at < ?",
                &[this_month, now],
            )
            .await?;
        let last_month_participants = self
            .count(
                "SELECT COUNT(*) FROM users WHERE role = 'participant' \
                 AND created_at >= ? AND created_at < ?",
                &[last_month, this_month],
            )
            .await?;

        let total_camps = self.count("SELECT COUNT(*) FROM camps", &[]).await?;
        let this_month_camps = self
            .count(
                "SELECT COUNT(*) FROM camps WHERE created_at >= ? AND created_at < ?",
                &[this_month, now],
            )
            .await?;
        let last_month_camps = self
            .count(
                "SELECT COUNT(*) FROM camps WHERE created_at >= ? AND created_at < ?",
                &[last_month, this_month],
            )
            .await?;

        let total_paid_payments = self
            .count("SELECT COUNT(*) FROM payments WHERE payment_status = 'paid'", &[])
            .await?;
        let this_month_paid = self
            .count(
                "SELECT COUNT(*) FROM payments WHERE payment_status = 'paid' \
                 AND paid_at >= ? AND paid_at < ?",
                &[this_month, now],
            )
            .await?;
        let last_month_paid = self
            .count(
                "SELECT COUNT(*) FROM payments WHERE payment_status = 'paid' \
                 AND paid_at >= ? AND paid_at < ?",
                &[last_month, this_month],
            )
            .await?;

        let total_pending_payments = self
            .count(
                "SELECT COUNT(*) FROM registrations WHERE payment_status = 'unpaid'",
                &[],
            )
            .await?;

        let total_revenue = self
            .revenue("SELECT COALESCE(SUM(amount_cents), 0) FROM payments \
                      WHERE payment_status = 'paid'", &[])
            .await?;
        let this_month_revenue = self
            .revenue(
                "SELECT COALESCE(SUM(amount_cents), 0) FROM payments \
                 WHERE payment_status = 'paid' AND paid_at >= ? AND paid_at < ?",
                &[this_month, now],
            )
            .await?;
        let last_month_revenue = self
            .revenue(
                "SELECT COALESCE(SUM(amount_cents), 0) FROM payments \
                 WHERE payment_status = 'paid' AND paid_at >= ? AND paid_at < ?",
                &[last_month, this_month],
            )
            .await?;

        Ok(AdminAnalytics {
            total_participants,
            participant_change: calculate_change(
                this_month_participants as f64,
                last_month_participants as f64,
            ),
            total_camps,
            camp_change: calculate_change(this_month_camps as f64, last_month_camps as f64),
            total_paid_payments,
            paid_payment_change: calculate_change(
                this_month_paid as f64,
                last_month_paid as f64,
            ),
            total_pending_payments,
            total_revenue,
            revenue_change: calculate_change(this_month_revenue, last_month_revenue),
        })
    }

    pub async fn participant_analytics(&self, email: &str) -> Result<ParticipantAnalytics> {
        let total_joined_camps = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM registrations WHERE participant_email = ?",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let total_paid_payments = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM payments \
             WHERE participant_email = ? AND payment_status = 'paid'",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let total_pending_payments = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM registrations \
             WHERE participant_email = ? AND payment_status = 'unpaid'",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let total_paid_cents = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM payments \
             WHERE participant_email = ? AND payment_status = 'paid'",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(ParticipantAnalytics {
            total_joined_camps,
            total_paid_payments,
            total_pending_payments,
            total_paid_amount: total_paid_cents as f64 / 100.0,
        })
    }

    async fn count(&self, sql: &str, bounds: &[NaiveDateTime]) -> Result<i64> {
        let mut query = sqlx::query_scalar::<_, i64>(sql);
        for bound in bounds {
            query = query.bind(*bound);
        }
        query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn revenue(&self, sql: &str, bounds: &[NaiveDateTime]) -> Result<f64> {
        let cents = self.count(sql, bounds).await?;
        Ok(cents as f64 / 100.0)
    }
}
