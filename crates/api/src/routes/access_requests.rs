//! Access-request routes.
//!
//! The self-service counterpart to invitations: a user asks to join, the
//! team reviews. Approval materializes the membership and flips the status
//! in one transaction, mirroring invitation acceptance.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::access_request::{
    AccessRequestWithUser, BusinessAccessRequest, CreateAccessRequestRequest,
};
use domain::models::BusinessRole;
use domain::services::permissions::Action;
use domain::services::team_policy::{check_review, check_withdraw};
use persistence::repositories::{AccessRequestRepository, UserRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_access_request_event;
use crate::middleware::UserAuth;
use crate::services::TeamService;

/// POST /api/v1/businesses/:business_id/access-requests
///
/// Asks to join a business at a requested role. Callers who already have a
/// relationship, or a pending request, are turned away.
pub async fn create_access_request(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(business_id): Path<Uuid>,
    Json(request): Json<CreateAccessRequestRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    if team.resolve_role(&business, auth.user_id).await?.is_some() {
        return Err(ApiError::Conflict(
            "You already have access to this business".to_string(),
        ));
    }

    let requested_role: BusinessRole = request
        .requested_role
        .parse()
        .map_err(|e: String| ApiError::Validation(e))?;

    let request_repo = AccessRequestRepository::new(state.pool.clone());
    if request_repo.has_pending(business_id, auth.user_id).await? {
        return Err(ApiError::Conflict(
            "A pending access request already exists".to_string(),
        ));
    }

    // Make sure the requester row exists before the FK write
    let user_repo = UserRepository::new(state.pool.clone());
    user_repo.upsert_from_claims(auth.user_id, &auth.email).await?;

    let entity = request_repo
        .create(
            business_id,
            auth.user_id,
            requested_role,
            request.message.as_deref(),
        )
        .await
        .map_err(|e| match ApiError::from(e) {
            // Lost a race with a concurrent request from the same user
            ApiError::Conflict(_) => {
                ApiError::Conflict("A pending access request already exists".to_string())
            }
            other => other,
        })?;

    record_access_request_event("created");
    info!(
        user_id = %auth.user_id,
        business_id = %business_id,
        request_id = %entity.id,
        requested_role = %requested_role,
        "Created access request"
    );

    Ok((
        StatusCode::CREATED,
        Json(BusinessAccessRequest::from(entity)),
    ))
}

/// GET /api/v1/businesses/:business_id/access-requests
///
/// Lists pending requests with requester identity, newest first.
pub async fn list_access_requests(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(business_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    team.require(&business, auth.user_id, Action::ManageTeam)
        .await?;

    let request_repo = AccessRequestRepository::new(state.pool.clone());
    let items: Vec<AccessRequestWithUser> = request_repo
        .list_pending_with_users(business_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(items))
}

/// POST /api/v1/access-requests/:request_id/approve
///
/// Approves a pending request: membership at the requested role plus the
/// status flip, committed together.
pub async fn approve_access_request(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let request_repo = AccessRequestRepository::new(state.pool.clone());
    let entity = request_repo
        .find_by_id(request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Access request not found".to_string()))?;
    let access_request = BusinessAccessRequest::from(entity);

    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(access_request.business_id).await?;
    team.require(&business, auth.user_id, Action::ManageTeam)
        .await?;

    check_review(&access_request).map_err(|_| {
        ApiError::NoLongerValid("Access request has already been reviewed".to_string())
    })?;

    let approved = request_repo
        .approve_with_membership(
            access_request.id,
            access_request.business_id,
            access_request.user_id,
            access_request.requested_role,
            auth.user_id,
        )
        .await?;
    if !approved {
        return Err(ApiError::NoLongerValid(
            "Access request has already been reviewed".to_string(),
        ));
    }

    record_access_request_event("approved");
    info!(
        reviewer_id = %auth.user_id,
        business_id = %access_request.business_id,
        request_id = %access_request.id,
        "Approved access request"
    );

    let updated = request_repo
        .find_by_id(request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Access request not found".to_string()))?;
    Ok(Json(BusinessAccessRequest::from(updated)))
}

/// POST /api/v1/access-requests/:request_id/reject
///
/// Rejects a pending request with reviewer metadata.
pub async fn reject_access_request(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let request_repo = AccessRequestRepository::new(state.pool.clone());
    let entity = request_repo
        .find_by_id(request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Access request not found".to_string()))?;
    let access_request = BusinessAccessRequest::from(entity);

    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(access_request.business_id).await?;
    team.require(&business, auth.user_id, Action::ManageTeam)
        .await?;

    check_review(&access_request).map_err(|_| {
        ApiError::NoLongerValid("Access request has already been reviewed".to_string())
    })?;

    let rejected = request_repo.reject(request_id, auth.user_id).await?;
    if !rejected {
        return Err(ApiError::NoLongerValid(
            "Access request has already been reviewed".to_string(),
        ));
    }

    record_access_request_event("rejected");
    info!(
        reviewer_id = %auth.user_id,
        business_id = %access_request.business_id,
        request_id = %access_request.id,
        "Rejected access request"
    );

    let updated = request_repo
        .find_by_id(request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Access request not found".to_string()))?;
    Ok(Json(BusinessAccessRequest::from(updated)))
}

/// DELETE /api/v1/access-requests/:request_id
///
/// Withdraws the caller's own request. Works in any status; the row is
/// removed outright.
pub async fn withdraw_access_request(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let request_repo = AccessRequestRepository::new(state.pool.clone());
    let entity = request_repo
        .find_by_id(request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Access request not found".to_string()))?;
    let access_request = BusinessAccessRequest::from(entity);

    check_withdraw(&access_request, auth.user_id).map_err(|_| {
        ApiError::InvariantViolation("Access request belongs to another user".to_string())
    })?;

    request_repo.delete(request_id).await?;

    record_access_request_event("withdrawn");
    info!(
        user_id = %auth.user_id,
        business_id = %access_request.business_id,
        request_id = %access_request.id,
        "Withdrew access request"
    );

    Ok(StatusCode::NO_CONTENT)
}
