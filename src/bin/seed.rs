use clap::Parser;
use fake::faker::address::en::CityName;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;
use sqlx::sqlite::SqlitePoolOptions;

use medi_ease::{
    domain::{CreateCampRequest, CreateFeedbackRequest, CreateUserRequest, Role},
    repository::{
        CampRepository, FeedbackRepository, RegistrationRepository, SqliteCampRepository,
        SqliteFeedbackRepository, SqliteRegistrationRepository, SqliteUserRepository,
        UserRepository,
    },
};

#[derive(Parser)]
#[command(about = "Seed the medi-ease database with development data")]
struct Args {
    /// Number of camps to create
    #[arg(long, default_value_t = 8)]
    camps: usize,

    /// Number of participants to create
    #[arg(long, default_value_t = 12)]
    participants: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("🌱 Starting database seeding...");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:medi-ease.db".to_string());

    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    println!("📋 Running migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let user_repo = SqliteUserRepository::new(db_pool.clone());
    let camp_repo = SqliteCampRepository::new(db_pool.clone());
    let registration_repo = SqliteRegistrationRepository::new(db_pool.clone());
    let feedback_repo = SqliteFeedbackRepository::new(db_pool.clone());

    println!("👥 Creating users...");

    let admin = user_repo
        .create(CreateUserRequest {
            email: "admin@medi-ease.local".to_string(),
            name: "Admin User".to_string(),
            photo_url: None,
            role: Some(Role::Admin),
        })
        .await?;
    println!("  ✅ Created admin user ({})", admin.email);

    let mut participants = Vec::new();
    for i in 0..args.participants {
        let name: String = Name().fake();
        let user = user_repo
            .create(CreateUserRequest {
                email: format!("participant{}@example.com", i),
                name,
                photo_url: None,
                role: Some(Role::Participant),
            })
            .await?;
        participants.push(user);
    }
    println!("  ✅ Created {} participants", participants.len());

    println!("🏕️  Creating camps...");
    let mut camps = Vec::new();
    for i in 0..args.camps {
        let camp = camp_repo
            .create(
                &admin.email,
                CreateCampRequest {
                    name: format!("{} Health Camp", CityName().fake::<String>()),
                    fee_cents: ((i as i64 % 5) + 1) * 1000,
                    date_time: chrono::Utc::now() + chrono::Duration::days(14 + i as i64),
                    location: CityName().fake(),
                    healthcare_professional: format!("Dr. {}", Name().fake::<String>()),
                    description: Sentence(8..16).fake(),
                    image_url: None,
                },
            )
            .await?;
        camps.push(camp);
    }
    println!("  ✅ Created {} camps", camps.len());

    println!("📝 Joining participants to camps...");
    let mut joined = 0;
    for (i, participant) in participants.iter().enumerate() {
        let camp = &camps[i % camps.len()];
        registration_repo
            .join(camp, &participant.email, &participant.name)
            .await?;
        joined += 1;

        feedback_repo
            .create(
                &participant.email,
                CreateFeedbackRequest {
                    camp_id: camp.id,
                    participant_name: participant.name.clone(),
                    rating: ((i as i64) % 5) + 1,
                    comment: Sentence(5..12).fake(),
                },
            )
            .await?;
    }
    println!("  ✅ Created {} registrations (with feedback)", joined);

    println!("🎉 Seeding complete!");

    Ok(())
}
