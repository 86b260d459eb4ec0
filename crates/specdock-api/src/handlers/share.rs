//! Share link handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use specdock_core::{SharePayload, SharePermissions};

use super::{internal_error, not_found, ErrorResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateShareBody {
    pub document_id: String,
    pub user_id: String,
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: i64,
    #[serde(default)]
    pub permissions: Option<SharePermissions>,
}

fn default_expiry_hours() -> i64 {
    24
}

#[derive(Debug, Serialize)]
pub struct CreateShareDto {
    pub token: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// POST /api/v1/shares
pub async fn create_share_link(
    State(state): State<AppState>,
    Json(body): Json<CreateShareBody>,
) -> Result<(StatusCode, Json<CreateShareDto>), (StatusCode, Json<ErrorResponse>)> {
    let permissions = body.permissions.unwrap_or_default();

    let token = state
        .share_tokens
        .create_share_token(&body.document_id, &body.user_id, body.expiry_hours, permissions)
        .map_err(|e| {
            warn!("failed to mint share token: {}", e);
            internal_error("Failed to create share token")
        })?;

    // The authoritative expiry is inside the signed payload; this field is
    // informational for the caller.
    let expires_at = chrono::Duration::try_hours(body.expiry_hours)
        .and_then(|d| Utc::now().checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    let url = state.share_tokens.share_url(&state.public_base_url, &token);

    info!(document_id = %body.document_id, expiry_hours = body.expiry_hours, "share link created");
    Ok((
        StatusCode::CREATED,
        Json(CreateShareDto {
            token,
            url,
            expires_at,
        }),
    ))
}

/// GET /api/v1/shares/{token}
///
/// Malformed, tampered and expired tokens are all 404, indistinguishably.
pub async fn resolve_share_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<SharePayload>, (StatusCode, Json<ErrorResponse>)> {
    match state.share_tokens.verify_share_token(&token) {
        Some(payload) => Ok(Json(payload)),
        None => {
            debug!("share token rejected");
            Err(not_found("Share link is invalid or has expired"))
        }
    }
}
