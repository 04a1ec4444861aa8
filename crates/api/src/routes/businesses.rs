//! Business CRUD routes.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::business::{
    Business, BusinessWithRole, CreateBusinessRequest, UpdateBusinessRequest,
};
use domain::services::permissions::{Action, PermissionSet};
use persistence::repositories::{BusinessRepository, UserRepository};
use shared::pagination::{PageQuery, Paged};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use crate::services::TeamService;

/// POST /api/v1/businesses
///
/// Creates a business. The caller becomes its owner and never appears in the
/// member table.
pub async fn create_business(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Json(request): Json<CreateBusinessRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    // Make sure the owner row exists before the FK write
    let user_repo = UserRepository::new(state.pool.clone());
    user_repo.upsert_from_claims(auth.user_id, &auth.email).await?;

    let business_repo = BusinessRepository::new(state.pool.clone());
    let entity = business_repo
        .create(
            auth.user_id,
            &request.name,
            &request.slug,
            request.industry.as_deref(),
            request.description.as_deref(),
        )
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => {
                ApiError::Conflict("A business with this slug already exists".to_string())
            }
            other => other,
        })?;

    info!(
        user_id = %auth.user_id,
        business_id = %entity.id,
        slug = %entity.slug,
        "Created business"
    );

    Ok((StatusCode::CREATED, Json(Business::from(entity))))
}

/// GET /api/v1/businesses
///
/// Lists the businesses the caller owns or is a member of, newest first.
pub async fn list_businesses(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let business_repo = BusinessRepository::new(state.pool.clone());

    let entities = business_repo
        .list_for_user(auth.user_id, query.limit(), query.offset())
        .await?;
    let total = business_repo.count_for_user(auth.user_id).await?;

    let items: Vec<BusinessWithRole> = entities.into_iter().map(Into::into).collect();

    Ok(Json(Paged::new(items, &query, total)))
}

/// GET /api/v1/businesses/:business_id
pub async fn get_business(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(business_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    team.require(&business, auth.user_id, Action::View).await?;

    Ok(Json(Business::from(business)))
}

/// PUT /api/v1/businesses/:business_id
///
/// Updates business details. Slug and owner are immutable.
///
/// Omitted fields keep their stored values, so industry and description
/// cannot be cleared here, only replaced.
pub async fn update_business(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(business_id): Path<uuid::Uuid>,
    Json(request): Json<UpdateBusinessRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    team.require(&business, auth.user_id, Action::Edit).await?;

    let name = request.name.as_deref().unwrap_or(&business.name);
    let industry = request
        .industry
        .as_deref()
        .or(business.industry.as_deref());
    let description = request
        .description
        .as_deref()
        .or(business.description.as_deref());

    let business_repo = BusinessRepository::new(state.pool.clone());
    let entity = business_repo
        .update(business_id, name, industry, description)
        .await?
        .ok_or_else(|| ApiError::NotFound("Business not found".to_string()))?;

    Ok(Json(Business::from(entity)))
}

/// DELETE /api/v1/businesses/:business_id
///
/// Deletes a business. Owner only; members, invitations, access requests and
/// the brand kit cascade away with it.
pub async fn delete_business(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(business_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    team.require(&business, auth.user_id, Action::Delete).await?;

    let business_repo = BusinessRepository::new(state.pool.clone());
    business_repo.delete(business_id).await?;

    info!(
        user_id = %auth.user_id,
        business_id = %business_id,
        "Deleted business"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/businesses/:business_id/permissions
///
/// Returns the caller's permission set for UI consumption. A caller with no
/// relationship to the business gets all-false flags, not a 403.
pub async fn get_permissions(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(business_id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    let role = team.resolve_role(&business, auth.user_id).await?;

    Ok(Json(PermissionSet::for_role(role)))
}
