//!
//! Parking reservation REST service.
//! Reads configuration from TOML file (~/.config/parkhub/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use parkhub::application::{AllocationService, CustomerService};
use parkhub::config::AppConfig;
use parkhub::domain::ParkingStore;
use parkhub::infrastructure::crypto::jwt::JwtConfig;
use parkhub::infrastructure::database::migrator::Migrator;
use parkhub::support::ShutdownCoordinator;
use parkhub::{create_api_router, default_config_path, init_database, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("PARKHUB_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting ParkHub reservation service...");

    // ── Build sub-configs from AppConfig ───────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "parkhub".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Services over the persistence port ─────────────────────
    let store: Arc<dyn ParkingStore> =
        Arc::new(parkhub::SeaOrmParkingStore::new(db.clone()));
    let allocation = Arc::new(AllocationService::new(Arc::clone(&store)));
    let customers = Arc::new(CustomerService::new(store));

    // Seed the default admin account on first start
    if let Err(e) = customers
        .ensure_default_admin(
            &app_cfg.admin.email,
            &app_cfg.admin.password,
            &app_cfg.admin.name,
        )
        .await
    {
        error!("Failed to seed default admin: {}", e);
    }

    // Initialize shutdown coordinator
    let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
    let shutdown_signal = shutdown.signal();

    // Start listening for shutdown signals (SIGTERM, SIGINT)
    shutdown.start_signal_listener();

    // Create REST API router
    let api_router = create_api_router(allocation, customers, db.clone(), jwt_config);

    // Start REST API server with graceful shutdown
    let api_addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    let api_shutdown = shutdown_signal.clone();
    axum::serve(listener, api_router)
        .with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("REST API server received shutdown signal");
        })
        .await?;

    // Perform final cleanup
    info!("Performing final cleanup...");

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("ParkHub shutdown complete");
    Ok(())
}
