// ABOUTME: Input validation for avatar uploads
// ABOUTME: Ordered size and media-type checks, pure CPU, no I/O

use thiserror::Error;

use crate::types::AvatarUpload;

/// Maximum accepted avatar payload size (5 MiB)
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// The single supported avatar media type
pub const AVATAR_CONTENT_TYPE: &str = "image/jpeg";

const JPEG_SIGNATURE: [u8; 3] = [0xFF, 0xD8, 0xFF];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Avatar payload is {size} bytes; maximum is {max}")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Unsupported avatar media type: {0}. Only JPEG is accepted")]
    UnsupportedMediaType(String),
}

/// Validate an optional avatar payload. Rules run in order and the first
/// failure wins: absent payload is valid, then size, then media type.
pub fn validate_avatar(avatar: Option<&AvatarUpload>) -> Result<(), ValidationError> {
    let Some(avatar) = avatar else {
        return Ok(());
    };

    if avatar.size_bytes() > MAX_AVATAR_BYTES {
        return Err(ValidationError::PayloadTooLarge {
            size: avatar.size_bytes(),
            max: MAX_AVATAR_BYTES,
        });
    }

    if !has_jpeg_signature(&avatar.content) {
        return Err(ValidationError::UnsupportedMediaType(
            declared_type(avatar).to_string(),
        ));
    }

    // Declarations, when present, must agree with the sniffed content
    if let Some(content_type) = &avatar.content_type {
        if !is_jpeg_media_type(content_type) {
            return Err(ValidationError::UnsupportedMediaType(content_type.clone()));
        }
    }

    if let Some(file_name) = &avatar.file_name {
        if !has_jpeg_extension(file_name) {
            return Err(ValidationError::UnsupportedMediaType(file_name.clone()));
        }
    }

    Ok(())
}

fn has_jpeg_signature(bytes: &[u8]) -> bool {
    bytes.len() >= JPEG_SIGNATURE.len() && bytes[..JPEG_SIGNATURE.len()] == JPEG_SIGNATURE
}

fn is_jpeg_media_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .eq_ignore_ascii_case(AVATAR_CONTENT_TYPE)
}

fn has_jpeg_extension(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg")
}

fn declared_type(avatar: &AvatarUpload) -> &str {
    avatar
        .content_type
        .as_deref()
        .or(avatar.file_name.as_deref())
        .unwrap_or("unknown")
}
