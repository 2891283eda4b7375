//!
//! Car rental backend: fleet management and rental bookings over REST.
//! Reads configuration from TOML file (~/.config/car-rental-service/config.toml).

use std::sync::Arc;

use tracing::{error, info};

use carrental::config::AppConfig;
use carrental::domain::{User, UserRole};
use carrental::infrastructure::crypto::jwt::JwtConfig;
use carrental::infrastructure::crypto::password::hash_password;
use carrental::infrastructure::storage::{FleetStore, ImageStore};
use carrental::{create_api_router, default_config_path};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("CAR_RENTAL_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
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

    info!("Starting car rental service...");

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "car-rental-service".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Stores ─────────────────────────────────────────────────
    let store = Arc::new(FleetStore::new());
    let images = Arc::new(ImageStore::new());

    create_default_admin(&store, &app_cfg).await;

    // ── REST API server with graceful shutdown ─────────────────
    let api_router = create_api_router(store, images, jwt_config);

    let api_addr = app_cfg.address();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!(
        "OpenAPI document available at http://{}/api/docs/openapi.json",
        api_addr
    );

    axum::serve(listener, api_router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    info!("Car rental service shutdown complete");
    Ok(())
}

/// Create default admin user if no users exist
async fn create_default_admin(store: &Arc<FleetStore>, app_cfg: &AppConfig) {
    let mut t = store.write().await;
    if t.user_count() > 0 {
        return;
    }

    info!("Creating default admin user...");
    let password_hash = match hash_password(&app_cfg.admin.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash admin password: {}", e);
            return;
        }
    };

    let admin = User::new(
        app_cfg.admin.username.clone(),
        app_cfg.admin.email.clone(),
        password_hash,
        UserRole::Admin,
    );
    let email = admin.email.clone();
    t.insert_user(admin);
    info!("Default admin created: {}", email);
    info!("Please change the admin password immediately!");
}
