//! Brand kit routes.
//!
//! One kit per business, addressed by the business rather than its own ID.
//! Sharing mints an opaque token that resolves to a public, identifier-free
//! view; disabling sharing invalidates the token.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::brand_kit::{
    BrandKit, ShareBrandKitResponse, SharedBrandKit, UpsertBrandKitRequest,
};
use domain::services::permissions::Action;
use persistence::repositories::BrandKitRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use crate::services::TeamService;

/// GET /api/v1/businesses/:business_id/brand-kit
pub async fn get_brand_kit(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(business_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    team.require(&business, auth.user_id, Action::View).await?;

    let kit_repo = BrandKitRepository::new(state.pool.clone());
    let entity = kit_repo
        .find_by_business(business_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Brand kit not found".to_string()))?;

    Ok(Json(BrandKit::from(entity)))
}

/// PUT /api/v1/businesses/:business_id/brand-kit
///
/// Creates or replaces the kit. Sharing state survives the upsert.
pub async fn upsert_brand_kit(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(business_id): Path<Uuid>,
    Json(request): Json<UpsertBrandKitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    team.require(&business, auth.user_id, Action::Edit).await?;

    let colors = serde_json::to_value(&request.colors)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize palette: {}", e)))?;
    let typography = request
        .typography
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| ApiError::Internal(format!("Failed to serialize typography: {}", e)))?;

    let kit_repo = BrandKitRepository::new(state.pool.clone());
    let entity = kit_repo
        .upsert(
            business_id,
            request.logo_url.as_deref(),
            colors,
            typography,
            request.tagline.as_deref(),
        )
        .await?;

    info!(
        user_id = %auth.user_id,
        business_id = %business_id,
        "Upserted brand kit"
    );

    Ok(Json(BrandKit::from(entity)))
}

/// POST /api/v1/businesses/:business_id/brand-kit/share
///
/// Enables public sharing with a fresh token. Re-sharing rotates the token.
pub async fn share_brand_kit(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(business_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    team.require(&business, auth.user_id, Action::Edit).await?;

    let token = state.token_provider.generate_token();

    let kit_repo = BrandKitRepository::new(state.pool.clone());
    let entity = kit_repo
        .set_share_token(business_id, &token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Brand kit not found".to_string()))?;

    info!(
        user_id = %auth.user_id,
        business_id = %business_id,
        "Enabled brand kit sharing"
    );

    Ok(Json(ShareBrandKitResponse {
        share_token: entity.share_token.unwrap_or(token),
        is_shared: entity.is_shared,
    }))
}

/// DELETE /api/v1/businesses/:business_id/brand-kit/share
///
/// Disables sharing and invalidates the token.
pub async fn unshare_brand_kit(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(business_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    team.require(&business, auth.user_id, Action::Edit).await?;

    let kit_repo = BrandKitRepository::new(state.pool.clone());
    let cleared = kit_repo.clear_share_token(business_id).await?;
    if !cleared {
        return Err(ApiError::NotFound("Brand kit not found".to_string()));
    }

    info!(
        user_id = %auth.user_id,
        business_id = %business_id,
        "Disabled brand kit sharing"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/shared/:share_token
///
/// Public view of a shared brand kit. Internal identifiers are omitted and
/// revoked tokens do not resolve.
pub async fn get_shared_brand_kit(
    State(state): State<AppState>,
    Path(share_token): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let kit_repo = BrandKitRepository::new(state.pool.clone());
    let entity = kit_repo
        .find_shared_by_token(&share_token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Shared brand kit not found".to_string()))?;

    Ok(Json(SharedBrandKit::from(entity)))
}
