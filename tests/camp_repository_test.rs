use chrono::Utc;
use medi_ease::{
    domain::{CampFilter, CampSort, CreateCampRequest, Page, UpdateCampRequest},
    repository::{CampRepository, SqliteCampRepository},
};
use sqlx::sqlite::SqlitePoolOptions;

async fn setup() -> anyhow::Result<SqliteCampRepository> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(SqliteCampRepository::new(pool))
}

fn camp_request(name: &str, fee_cents: i64) -> CreateCampRequest {
    CreateCampRequest {
        name: name.to_string(),
        fee_cents,
        date_time: Utc::now(),
        location: "Chittagong".to_string(),
        healthcare_professional: "Dr. Khan".to_string(),
        description: "Screening and checkup".to_string(),
        image_url: None,
    }
}

#[tokio::test]
async fn camp_crud() -> anyhow::Result<()> {
    let repo = setup().await?;

    let camp = repo.create("admin@example.com", camp_request("Eye Camp", 2000)).await?;
    assert_eq!(camp.name, "Eye Camp");
    assert_eq!(camp.fee(), 20.0);
    assert_eq!(camp.participant_count, 0);
    assert_eq!(camp.created_by, "admin@example.com");

    let found = repo.find_by_id(camp.id).await?;
    assert!(found.is_some());

    // Partial update touches only the supplied fields.
    let updated = repo
        .update(
            camp.id,
            UpdateCampRequest {
                fee_cents: Some(2500),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.fee_cents, 2500);
    assert_eq!(updated.name, "Eye Camp");
    assert_eq!(updated.location, "Chittagong");

    repo.delete(camp.id).await?;
    assert!(repo.find_by_id(camp.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn search_is_case_insensitive_substring_match() -> anyhow::Result<()> {
    let repo = setup().await?;

    repo.create("admin@example.com", camp_request("Free Eye Camp", 0)).await?;
    repo.create("admin@example.com", camp_request("Dental Camp", 1000)).await?;
    repo.create("admin@example.com", camp_request("eyesight screening", 500)).await?;

    let filter = CampFilter {
        search: Some("EYE".to_string()),
        ..Default::default()
    };
    let found = repo.list(&filter, None).await?;

    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|c| c.name.to_lowercase().contains("eye")));

    Ok(())
}

#[tokio::test]
async fn sort_keys_are_deterministic() -> anyhow::Result<()> {
    let repo = setup().await?;

    let cheap = repo.create("admin@example.com", camp_request("Bravo Camp", 500)).await?;
    let pricey = repo.create("admin@example.com", camp_request("alpha camp", 5000)).await?;
    let middle = repo.create("admin@example.com", camp_request("Charlie Camp", 2000)).await?;

    let by_fee = repo
        .list(
            &CampFilter {
                sort: CampSort::LowestFee,
                ..Default::default()
            },
            None,
        )
        .await?;
    assert_eq!(
        by_fee.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![cheap.id, middle.id, pricey.id]
    );

    // Alphabetical sorting is case-insensitive.
    let by_name = repo
        .list(
            &CampFilter {
                sort: CampSort::Alphabetical,
                ..Default::default()
            },
            None,
        )
        .await?;
    assert_eq!(
        by_name.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["alpha camp", "Bravo Camp", "Charlie Camp"]
    );

    Ok(())
}

#[tokio::test]
async fn popular_orders_by_participant_count_and_caps_at_limit() -> anyhow::Result<()> {
    let repo = setup().await?;

    let mut ids = Vec::new();
    for i in 0..8 {
        let camp = repo
            .create("admin@example.com", camp_request(&format!("Camp {}", i), 100))
            .await?;
        // Give camp i a participant count of i via the atomic increment.
        for _ in 0..i {
            repo.increment_participant_count(camp.id).await?;
        }
        ids.push(camp.id);
    }

    let popular = repo.popular(6).await?;
    assert_eq!(popular.len(), 6);
    assert_eq!(popular[0].participant_count, 7);
    for window in popular.windows(2) {
        assert!(window[0].participant_count >= window[1].participant_count);
    }

    Ok(())
}

#[tokio::test]
async fn pagination_returns_requested_window_or_empty() -> anyhow::Result<()> {
    let repo = setup().await?;

    for i in 0..25 {
        repo.create("admin@example.com", camp_request(&format!("Camp {:02}", i), 100))
            .await?;
    }

    let filter = CampFilter {
        sort: CampSort::Alphabetical,
        ..Default::default()
    };

    // page=2, size=10 -> records 21..=25 in sort order.
    let page = repo.list(&filter, Some(Page { page: 2, size: 10 })).await?;
    assert_eq!(page.len(), 5);
    assert_eq!(page[0].name, "Camp 20");
    assert_eq!(page[4].name, "Camp 24");

    // Out-of-range page yields an empty list, never an error.
    let empty = repo.list(&filter, Some(Page { page: 9, size: 10 })).await?;
    assert!(empty.is_empty());

    Ok(())
}

#[tokio::test]
async fn list_filters_by_creator() -> anyhow::Result<()> {
    let repo = setup().await?;

    repo.create("admin@example.com", camp_request("Mine", 100)).await?;
    repo.create("other@example.com", camp_request("Theirs", 100)).await?;

    let filter = CampFilter {
        created_by: Some("admin@example.com".to_string()),
        ..Default::default()
    };
    let mine = repo.list(&filter, Some(Page::default())).await?;

    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "Mine");

    assert_eq!(repo.count().await?, 2);

    Ok(())
}
