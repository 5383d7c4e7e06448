// ABOUTME: HTTP request handlers for user settings and avatar operations
// ABOUTME: Multipart settings updates, settings read-back, avatar streaming

use axum::{
    extract::{
        multipart::{Field, Multipart, MultipartError},
        Path, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use tracing::info;

use plume_settings::{AvatarUpload, ValidationError, MAX_AVATAR_BYTES};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::{AppState, BODY_LIMIT_BYTES};

/// Multipart field name carrying the avatar file
const AVATAR_FIELD: &str = "avatar";

/// Update the caller's settings record, optionally replacing their avatar.
/// Text parts become settings fields; the `avatar` file part is validated
/// and stored by the service. Succeeds with 204 and an empty body.
pub async fn update_settings(
    State(state): State<AppState>,
    current_user: CurrentUser,
    mut multipart: Multipart,
) -> Result<StatusCode, ApiError> {
    info!("Updating settings for user {}", current_user.user_id);

    let mut fields = Map::new();
    let mut avatar: Option<AvatarUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        if name == AVATAR_FIELD {
            let content_type = field.content_type().map(str::to_string);
            let file_name = field.file_name().map(str::to_string);
            let (content, truncated) = read_avatar_capped(field).await?;
            avatar = Some(AvatarUpload {
                content,
                content_type,
                file_name,
            });
            if truncated {
                // Over-size payload: stop reading, validation reports it
                break;
            }
        } else if !name.is_empty() {
            let is_json = field
                .content_type()
                .map(|ct| ct.starts_with("application/json"))
                .unwrap_or(false);
            let text = field.text().await.map_err(multipart_error)?;
            let value = if is_json {
                serde_json::from_str(&text).map_err(|e| ApiError::BadRequest(e.to_string()))?
            } else {
                Value::String(text)
            };
            fields.insert(name, value);
        }
    }

    state
        .settings_service
        .update_settings(current_user.user_id, fields, avatar)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Get the caller's current settings record
pub async fn get_settings(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Value>, ApiError> {
    info!("Getting settings for user {}", current_user.user_id);

    let record = state
        .settings_service
        .get_settings(current_user.user_id)
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": record,
        "error": null
    })))
}

/// Get a user's avatar by id. Open endpoint; 204 when the user has no avatar.
pub async fn get_avatar(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Response, ApiError> {
    info!("Getting avatar for user {}", user_id);

    if user_id <= 0 {
        return Err(ApiError::BadRequest(
            "user id must be a positive integer".to_string(),
        ));
    }

    match state.settings_service.get_avatar(user_id).await? {
        Some(asset) => Ok((
            [(header::CONTENT_TYPE, asset.content_type)],
            asset.content,
        )
            .into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// Read the avatar part in bounded chunks, keeping at most one byte past the
/// maximum so an over-size upload is detected without buffering it whole.
async fn read_avatar_capped(mut field: Field<'_>) -> Result<(Vec<u8>, bool), ApiError> {
    let mut content = Vec::new();

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if content.len() + chunk.len() > MAX_AVATAR_BYTES {
            let keep = (MAX_AVATAR_BYTES + 1).saturating_sub(content.len());
            content.extend_from_slice(&chunk[..keep.min(chunk.len())]);
            return Ok((content, true));
        }
        content.extend_from_slice(&chunk);
    }

    Ok((content, false))
}

/// Map a multipart read failure onto the API error taxonomy. A tripped
/// body-length limit means the payload exceeded even the framing headroom,
/// so it surfaces as the over-size rejection rather than a malformed request.
fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::Validation(ValidationError::PayloadTooLarge {
            size: BODY_LIMIT_BYTES,
            max: MAX_AVATAR_BYTES,
        })
    } else {
        ApiError::BadRequest(err.to_string())
    }
}
