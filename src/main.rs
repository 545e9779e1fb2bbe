//! Bistro Core - Restaurant Menu Backend
//!
//! Admins authenticate to manage menu items and admin accounts; an
//! unauthenticated endpoint serves the menu for the public page.

use sqlx::sqlite::SqlitePool;
use tokio::net::TcpListener;

mod api;
mod auth;
mod config;
mod domain;
mod error;
mod logging;
mod storage;
mod uploads;

use crate::api::build_router;
use crate::auth::JwtManager;
use crate::config::Config;
use crate::storage::BistroRepository;
use crate::uploads::ImageStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database repository.
    pub repository: BistroRepository,
    /// JWT manager for token operations.
    pub jwt_manager: JwtManager,
    /// Image upload store.
    pub images: ImageStore,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        // Missing .env is expected in production
        eprintln!("Note: No .env file loaded ({e})");
    }

    // Initialize logging
    logging::init();

    tracing::info!("Starting Bistro Core v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.url,
        uploads = %config.uploads.dir,
        "Configuration loaded"
    );

    // Connect to database
    let pool = SqlitePool::connect(&config.database.url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            anyhow::anyhow!("Database connection error: {}", e)
        })?;

    // Initialize repository and schema
    let repository = BistroRepository::new(pool);
    repository.init_schema().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize database schema");
        anyhow::anyhow!("Schema initialization error: {}", e)
    })?;

    tracing::info!("Database connected and schema initialized");

    // Seed the bootstrap admin into an empty store
    let bootstrap_hash = auth::password::hash_password(&config.auth.bootstrap_password)?;
    let created = repository
        .bootstrap_admin(
            &config.auth.bootstrap_username,
            config.auth.bootstrap_email.as_deref(),
            &bootstrap_hash,
        )
        .await?;

    if created {
        tracing::info!(
            username = %config.auth.bootstrap_username,
            "Bootstrap admin created - change the default password"
        );
    } else {
        tracing::debug!(
            username = %config.auth.bootstrap_username,
            "Bootstrap admin already present"
        );
    }

    // Build authentication and upload components
    let jwt_manager = JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.jwt_issuer.clone(),
        config.auth.token_ttl_minutes,
    );
    let images = ImageStore::new(&config.uploads.dir)?;

    // Build application state
    let state = AppState {
        repository,
        jwt_manager,
        images,
    };

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("OpenAPI document available at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
