use chrono::Utc;
use medi_ease::{
    domain::{
        ConfirmationStatus, CreateCampRequest, CreateFeedbackRequest, Page,
        RecordPaymentRequest, RegistrationFilter,
    },
    repository::{
        CampRepository, FeedbackRepository, PaymentRepository, RegistrationRepository,
        SqliteCampRepository, SqliteFeedbackRepository, SqlitePaymentRepository,
        SqliteRegistrationRepository,
    },
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

async fn setup() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

async fn pay_for_camp(
    pool: &SqlitePool,
    camp_name: &str,
    email: &str,
    amount_cents: i64,
) -> anyhow::Result<()> {
    let camp_repo = SqliteCampRepository::new(pool.clone());
    let registration_repo = SqliteRegistrationRepository::new(pool.clone());
    let payment_repo = SqlitePaymentRepository::new(pool.clone());

    let camp = camp_repo
        .create(
            "admin@example.com",
            CreateCampRequest {
                name: camp_name.to_string(),
                fee_cents: amount_cents,
                date_time: Utc::now(),
                location: "Dhaka".to_string(),
                healthcare_professional: "Dr. Rahman".to_string(),
                description: "Checkup".to_string(),
                image_url: None,
            },
        )
        .await?;
    let registration = registration_repo.join(&camp, email, "Participant").await?;
    payment_repo
        .record(RecordPaymentRequest {
            registration_id: registration.id,
            camp_name: camp.name,
            email: email.to_string(),
            amount: amount_cents,
            payment_method: "card".to_string(),
            transaction_id: format!("pi_{}_{}", camp_name.replace(' ', "_"), email),
            confirmation_status: ConfirmationStatus::Pending,
        })
        .await?;

    Ok(())
}

#[tokio::test]
async fn history_is_scoped_searchable_and_paginated() -> anyhow::Result<()> {
    let pool = setup().await?;
    let payment_repo = SqlitePaymentRepository::new(pool.clone());

    pay_for_camp(&pool, "Eye Camp", "alice@example.com", 2000).await?;
    pay_for_camp(&pool, "Dental Camp", "alice@example.com", 1000).await?;
    pay_for_camp(&pool, "Eye Camp", "bob@example.com", 2000).await?;

    // Scoped to the caller.
    let alice = payment_repo
        .list_for_participant(
            "alice@example.com",
            &RegistrationFilter::default(),
            Page::default(),
        )
        .await?;
    assert_eq!(alice.len(), 2);
    assert!(alice.iter().all(|p| p.participant_email == "alice@example.com"));

    // Case-insensitive camp-name search.
    let searched = payment_repo
        .list_for_participant(
            "alice@example.com",
            &RegistrationFilter {
                search: Some("dental".to_string()),
            },
            Page::default(),
        )
        .await?;
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].camp_name, "Dental Camp");
    assert_eq!(searched[0].amount(), 10.00);

    // Out-of-range page is empty.
    let empty = payment_repo
        .list_for_participant(
            "alice@example.com",
            &RegistrationFilter::default(),
            Page { page: 5, size: 10 },
        )
        .await?;
    assert!(empty.is_empty());

    assert_eq!(payment_repo.count_for_participant("alice@example.com").await?, 2);
    assert_eq!(payment_repo.count_for_participant("bob@example.com").await?, 1);

    Ok(())
}

#[tokio::test]
async fn recent_feedback_is_newest_first_and_capped() -> anyhow::Result<()> {
    let pool = setup().await?;
    let feedback_repo = SqliteFeedbackRepository::new(pool.clone());

    let camp_id = uuid::Uuid::new_v4();
    for i in 0..12i64 {
        feedback_repo
            .create(
                &format!("user{}@example.com", i),
                CreateFeedbackRequest {
                    camp_id,
                    participant_name: format!("User {}", i),
                    rating: (i % 5) + 1,
                    comment: "Well organized".to_string(),
                },
            )
            .await?;
    }

    let recent = feedback_repo.list_recent(10).await?;
    assert_eq!(recent.len(), 10);
    for window in recent.windows(2) {
        assert!(window[0].created_at >= window[1].created_at);
    }

    Ok(())
}
