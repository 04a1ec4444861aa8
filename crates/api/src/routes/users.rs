//! User profile routes.
//!
//! Users are provisioned lazily: the first authenticated request upserts the
//! caller's row from JWT claims, so the rest of the system can join against
//! local identity data without a provisioning webhook.

use axum::{
    extract::{Extension, State},
    response::IntoResponse,
    Json,
};
use domain::models::User;
use persistence::repositories::UserRepository;
use serde::Deserialize;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;

/// Request to update the caller's profile.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProfileRequest {
    #[validate(length(
        max = 120,
        message = "Display name must be at most 120 characters"
    ))]
    pub display_name: Option<String>,
}

/// GET /api/v1/me
///
/// Returns the caller's profile, creating the row from JWT claims on first
/// contact.
pub async fn get_me(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
) -> Result<impl IntoResponse, ApiError> {
    let user_repo = UserRepository::new(state.pool.clone());
    let entity = user_repo.upsert_from_claims(auth.user_id, &auth.email).await?;

    Ok(Json(User::from(entity)))
}

/// PUT /api/v1/me
///
/// Updates the caller's display name.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let user_repo = UserRepository::new(state.pool.clone());
    // Make sure the row exists even if this is the first request we see
    user_repo.upsert_from_claims(auth.user_id, &auth.email).await?;

    let entity = user_repo
        .update_display_name(auth.user_id, request.display_name.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(User::from(entity)))
}
