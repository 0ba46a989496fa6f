use std::env;
use std::sync::Arc;

use gatherly::api;
use gatherly::auth::InMemoryAuth;
use gatherly::repositories::EventRepository;
use gatherly::services::Notifier;
use gatherly::store::PgEventStore;

use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatherly=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Gatherly v{}", env!("CARGO_PKG_VERSION"));

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    info!("Database connected");

    let repo = EventRepository::new(Arc::new(PgEventStore::new(pool)));
    let auth = Arc::new(InMemoryAuth::new());
    let notifier = Notifier::from_env();

    let app = api::build_router(repo, auth, notifier)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3420".to_string());
    let addr = format!("{}:{}", host, port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
