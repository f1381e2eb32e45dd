use std::sync::Arc;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medi_ease::{
    api,
    auth::IdentityVerifier,
    config::Settings,
    payments::{PaymentGateway, StripeGateway},
    service::ServiceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medi_ease=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });

    tracing::info!(
        "Starting medi-ease server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    // Identity verifier for the external provider's tokens
    let identity_verifier = Arc::new(IdentityVerifier::new(&settings.auth.jwt_secret));

    // Create service context
    let service_context = Arc::new(ServiceContext::with_sqlite(db_pool.clone()));

    // Initialize Stripe gateway if configured
    let payment_gateway: Option<Arc<dyn PaymentGateway>> = if settings.stripe.enabled {
        if let Some(secret_key) = settings.stripe.secret_key.clone() {
            tracing::info!("Stripe payment processing enabled");
            Some(Arc::new(StripeGateway::new(secret_key)))
        } else {
            tracing::warn!("Stripe enabled but missing secret key");
            None
        }
    } else {
        tracing::info!("Stripe payment processing disabled");
        None
    };

    let app = api::create_app(
        service_context,
        identity_verifier,
        payment_gateway,
        Arc::new(settings.clone()),
    );

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port),
    )
    .await?;

    tracing::info!(
        "Server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
