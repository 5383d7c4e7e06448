// ABOUTME: HTTP API layer for Plume providing REST endpoints and routing
// ABOUTME: Maps the settings service onto axum handlers

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch},
    Router,
};

use plume_settings::{SettingsService, MAX_AVATAR_BYTES};

pub mod auth;
pub mod error;
pub mod settings_handlers;

pub use auth::CurrentUser;
pub use error::ApiError;

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub settings_service: Arc<SettingsService>,
}

/// Headroom over the avatar cap for multipart framing and text fields
pub(crate) const BODY_LIMIT_BYTES: usize = MAX_AVATAR_BYTES + 64 * 1024;

/// Creates the user settings API router (nested under /user/settings)
pub fn create_settings_router() -> Router<AppState> {
    Router::new()
        .route("/", patch(settings_handlers::update_settings))
        .route("/get", get(settings_handlers::get_settings))
        .route("/avatar/{id}", get(settings_handlers::get_avatar))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}
