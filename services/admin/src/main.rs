use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod session;
mod validation;

use sqlx::PgPool;

use crate::repositories::{ProductRepository, UserRepository};
use crate::session::SessionService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub session_service: SessionService,
    pub user_repository: UserRepository,
    pub product_repository: ProductRepository,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting store admin service");

    // Initialize database connection pool
    let db_config = common::database::DatabaseConfig::from_env()?;
    let pool = common::database::init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Run embedded migrations
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Initialize the session codec; the signing secret lives here and
    // nowhere else
    let session_config = session::SessionConfig::from_env()?;
    let session_service = SessionService::new(&session_config);

    let user_repository = UserRepository::new(pool.clone());
    let product_repository = ProductRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        session_service,
        user_repository,
        product_repository,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    info!("Store admin service listening on 0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}
