// ABOUTME: Entry point for the Plume user settings server
// ABOUTME: Wires storage, settings service and HTTP routes together

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use plume_api::{create_settings_router, AppState};
use plume_settings::SettingsService;
use plume_storage::{Database, SqliteAvatarStore, SqliteSettingsStore};

mod config;
mod health;

use config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    println!("🚀 Starting Plume server...");
    println!("📡 Server will run on http://localhost:{}", config.port);
    println!("🔗 CORS origin: {}", config.cors_origin);

    let database = Database::init_with_path(config.database_path.clone()).await?;

    let settings_service = Arc::new(SettingsService::new(
        Arc::new(SqliteSettingsStore::new(database.pool.clone())),
        Arc::new(SqliteAvatarStore::new(database.pool.clone())),
    ));
    let state = AppState { settings_service };

    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<axum::http::HeaderValue>()?)
        .allow_methods([Method::GET, Method::PATCH])
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/user/settings", create_settings_router())
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    println!("✅ Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
