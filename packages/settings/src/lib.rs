// ABOUTME: Settings-and-avatar management core for Plume
// ABOUTME: Validates avatar uploads and orchestrates the settings and avatar stores

pub mod service;
pub mod types;
pub mod validation;


pub use service::{ServiceError, SettingsService};
pub use types::AvatarUpload;
pub use validation::{validate_avatar, ValidationError, AVATAR_CONTENT_TYPE, MAX_AVATAR_BYTES};
