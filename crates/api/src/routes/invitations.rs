//! Invitation routes.
//!
//! Team-side management (create, list, revoke) lives under the business;
//! token redemption (lookup, accept, decline) is addressed by the opaque
//! token alone. Expiry is lazy: a redemption attempt that observes a stale
//! deadline persists the `expired` flip before failing.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use domain::models::invitation::{
    BusinessInvitation, CreateInvitationRequest, CreateInvitationResponse, InvitationSummary,
    InvitationWithDetails,
};
use domain::models::BusinessRole;
use domain::services::permissions::Action;
use domain::services::team_policy::{
    check_accept, check_decline, InvitationDecision, InvitationRefusal,
};
use persistence::entities::InvitationStatusDb;
use persistence::repositories::{InvitationRepository, MemberRepository, UserRepository};
use serde::{Deserialize, Serialize};
use shared::pagination::{PageQuery, Paged};
use shared::token::default_invitation_expiration;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_invitation_event;
use crate::middleware::UserAuth;
use crate::services::TeamService;

/// Query parameters for invitation listings.
#[derive(Debug, Clone, Deserialize)]
pub struct ListInvitationsQuery {
    /// Optional status filter: pending, accepted, declined or expired.
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListInvitationsQuery {
    fn page(&self) -> PageQuery {
        PageQuery {
            limit: self.limit,
            offset: self.offset,
        }
    }

    fn status_filter(&self) -> Result<Option<InvitationStatusDb>, ApiError> {
        match self.status.as_deref() {
            None => Ok(None),
            Some("pending") => Ok(Some(InvitationStatusDb::Pending)),
            Some("accepted") => Ok(Some(InvitationStatusDb::Accepted)),
            Some("declined") => Ok(Some(InvitationStatusDb::Declined)),
            Some("expired") => Ok(Some(InvitationStatusDb::Expired)),
            Some(other) => Err(ApiError::Validation(format!(
                "Unknown invitation status: {}",
                other
            ))),
        }
    }
}

/// Response after redeeming an invitation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AcceptInvitationResponse {
    pub business_id: Uuid,
    pub role: BusinessRole,
}

/// POST /api/v1/businesses/:business_id/invitations
///
/// Invites an email address to join at a role. The token is returned here
/// and never again.
pub async fn create_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(business_id): Path<Uuid>,
    Json(request): Json<CreateInvitationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    team.require(&business, auth.user_id, Action::ManageTeam)
        .await?;

    let role: BusinessRole = request
        .role
        .parse()
        .map_err(|e: String| ApiError::Validation(e))?;

    // Reject invitations to addresses that already have a relationship
    let user_repo = UserRepository::new(state.pool.clone());
    if let Some(user) = user_repo.find_by_email(&request.email).await? {
        if user.id == business.owner_user_id {
            return Err(ApiError::Conflict(
                "This email belongs to the business owner".to_string(),
            ));
        }
        let member_repo = MemberRepository::new(state.pool.clone());
        if member_repo
            .find_by_business_and_user(business_id, user.id)
            .await?
            .is_some()
        {
            return Err(ApiError::Conflict(
                "This email is already a member of the business".to_string(),
            ));
        }
    }

    let invitation_repo = InvitationRepository::new(state.pool.clone());
    if invitation_repo.has_pending(business_id, &request.email).await? {
        return Err(ApiError::Conflict(
            "A pending invitation already exists for this email".to_string(),
        ));
    }

    let token = state.token_provider.generate_token();
    let expires_at = default_invitation_expiration();

    let entity = invitation_repo
        .create(
            business_id,
            &request.email,
            role,
            Some(auth.user_id),
            &token,
            expires_at,
        )
        .await
        .map_err(|e| match ApiError::from(e) {
            // Lost a race with a concurrent invite for the same email
            ApiError::Conflict(_) => ApiError::Conflict(
                "A pending invitation already exists for this email".to_string(),
            ),
            other => other,
        })?;

    record_invitation_event("created");
    info!(
        caller_id = %auth.user_id,
        business_id = %business_id,
        invitation_id = %entity.id,
        role = %role,
        "Created invitation"
    );

    let invitation = BusinessInvitation::from(entity);
    Ok((
        StatusCode::CREATED,
        Json(CreateInvitationResponse {
            id: invitation.id,
            business_id: invitation.business_id,
            email: invitation.email,
            role: invitation.role,
            token: invitation.token,
            status: invitation.status,
            expires_at: invitation.expires_at,
            created_at: invitation.created_at,
        }),
    ))
}

/// GET /api/v1/businesses/:business_id/invitations
///
/// Lists invitations with an optional status filter. Tokens are omitted.
pub async fn list_invitations(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(business_id): Path<Uuid>,
    Query(query): Query<ListInvitationsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    team.require(&business, auth.user_id, Action::ManageTeam)
        .await?;

    let status = query.status_filter()?;
    let page = query.page();

    let invitation_repo = InvitationRepository::new(state.pool.clone());
    let entities = invitation_repo
        .list_by_business(business_id, status, page.limit(), page.offset())
        .await?;
    let total = invitation_repo
        .count_by_business(business_id, status)
        .await?;

    let items: Vec<InvitationSummary> = entities
        .into_iter()
        .map(|entity| {
            let invitation = BusinessInvitation::from(entity);
            InvitationSummary {
                id: invitation.id,
                email: invitation.email,
                role: invitation.role,
                status: invitation.status,
                expires_at: invitation.expires_at,
                created_at: invitation.created_at,
            }
        })
        .collect();

    Ok(Json(Paged::new(items, &page, total)))
}

/// DELETE /api/v1/businesses/:business_id/invitations/:invitation_id
///
/// Revokes an invitation in any status.
pub async fn revoke_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path((business_id, invitation_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    team.require(&business, auth.user_id, Action::ManageTeam)
        .await?;

    let invitation_repo = InvitationRepository::new(state.pool.clone());
    let deleted = invitation_repo.delete(invitation_id, business_id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Invitation not found".to_string()));
    }

    info!(
        caller_id = %auth.user_id,
        business_id = %business_id,
        invitation_id = %invitation_id,
        "Revoked invitation"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/invitations/:token
///
/// Public lookup serving the acceptance page: invitation details joined with
/// the business summary and inviter identity.
pub async fn get_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let invitation_repo = InvitationRepository::new(state.pool.clone());
    let entity = invitation_repo
        .find_with_details(&token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    Ok(Json(InvitationWithDetails::from(entity)))
}

/// POST /api/v1/invitations/:token/accept
///
/// Redeems an invitation for the authenticated caller. The membership insert
/// and the status flip commit together; a retry after a partial failure
/// converges instead of erroring.
pub async fn accept_invitation(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let invitation_repo = InvitationRepository::new(state.pool.clone());
    let entity = invitation_repo
        .find_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;
    let invitation = BusinessInvitation::from(entity);

    match check_accept(&invitation, &auth.email, Utc::now()) {
        InvitationDecision::Proceed => {}
        InvitationDecision::ExpireThenRefuse => {
            invitation_repo.mark_expired(invitation.id).await?;
            record_invitation_event("expired");
            return Err(ApiError::Expired("Invitation has expired".to_string()));
        }
        InvitationDecision::Refuse(InvitationRefusal::NoLongerValid) => {
            return Err(ApiError::NoLongerValid(
                "Invitation is no longer valid".to_string(),
            ));
        }
        InvitationDecision::Refuse(InvitationRefusal::EmailMismatch) => {
            return Err(ApiError::InvariantViolation(
                "Invitation was issued for a different email address".to_string(),
            ));
        }
        InvitationDecision::Refuse(InvitationRefusal::Expired) => {
            return Err(ApiError::Expired("Invitation has expired".to_string()));
        }
    }

    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(invitation.business_id).await?;
    if business.owner_user_id == auth.user_id {
        return Err(ApiError::Conflict(
            "You already own this business".to_string(),
        ));
    }

    // Make sure the member row's FK target exists
    let user_repo = UserRepository::new(state.pool.clone());
    user_repo.upsert_from_claims(auth.user_id, &auth.email).await?;

    let accepted = invitation_repo
        .accept_with_membership(
            invitation.id,
            invitation.business_id,
            auth.user_id,
            invitation.role,
            invitation.invited_by,
        )
        .await?;
    if !accepted {
        return Err(ApiError::NoLongerValid(
            "Invitation is no longer valid".to_string(),
        ));
    }

    record_invitation_event("accepted");
    info!(
        user_id = %auth.user_id,
        business_id = %invitation.business_id,
        invitation_id = %invitation.id,
        "Accepted invitation"
    );

    Ok(Json(AcceptInvitationResponse {
        business_id: invitation.business_id,
        role: invitation.role,
    }))
}

/// POST /api/v1/invitations/:token/decline
///
/// Declines an invitation. Open to whoever holds the token; the guard order
/// mirrors accept minus the email check.
pub async fn decline_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let invitation_repo = InvitationRepository::new(state.pool.clone());
    let entity = invitation_repo
        .find_by_token(&token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;
    let invitation = BusinessInvitation::from(entity);

    match check_decline(&invitation, Utc::now()) {
        InvitationDecision::Proceed => {}
        InvitationDecision::ExpireThenRefuse => {
            invitation_repo.mark_expired(invitation.id).await?;
            record_invitation_event("expired");
            return Err(ApiError::Expired("Invitation has expired".to_string()));
        }
        InvitationDecision::Refuse(_) => {
            return Err(ApiError::NoLongerValid(
                "Invitation is no longer valid".to_string(),
            ));
        }
    }

    let declined = invitation_repo.decline(invitation.id).await?;
    if !declined {
        return Err(ApiError::NoLongerValid(
            "Invitation is no longer valid".to_string(),
        ));
    }

    record_invitation_event("declined");
    info!(
        business_id = %invitation.business_id,
        invitation_id = %invitation.id,
        "Declined invitation"
    );

    Ok(StatusCode::NO_CONTENT)
}
