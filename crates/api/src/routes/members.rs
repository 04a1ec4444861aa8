//! Team membership routes.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::member::{
    MemberWithUser, OwnerSummary, TeamResponse, UpdateMemberRoleRequest,
};
use domain::models::BusinessRole;
use domain::services::permissions::Action;
use domain::services::team_policy::{check_remove_member, RemovalRefusal};
use persistence::repositories::{MemberRepository, UserRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::UserAuth;
use crate::services::TeamService;

/// GET /api/v1/businesses/:business_id/members
///
/// Lists the team: the owner summary plus all member rows with identity.
pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path(business_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    team.require(&business, auth.user_id, Action::ManageTeam)
        .await?;

    let user_repo = UserRepository::new(state.pool.clone());
    let owner = user_repo
        .find_by_id(business.owner_user_id)
        .await?
        .ok_or_else(|| ApiError::Internal("Business owner row is missing".to_string()))?;

    let member_repo = MemberRepository::new(state.pool.clone());
    let members: Vec<MemberWithUser> = member_repo
        .list_with_users(business_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(TeamResponse {
        owner: OwnerSummary {
            user_id: owner.id,
            email: owner.email,
            display_name: owner.display_name,
        },
        members,
    }))
}

/// PUT /api/v1/businesses/:business_id/members/:user_id
///
/// Changes a member's role. The owner has no member row and no mutable role.
pub async fn update_member_role(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path((business_id, user_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateMemberRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate()?;

    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    team.require(&business, auth.user_id, Action::ManageTeam)
        .await?;

    if user_id == business.owner_user_id {
        return Err(ApiError::InvariantViolation(
            "The business owner's role cannot be changed".to_string(),
        ));
    }

    let role: BusinessRole = request
        .role
        .parse()
        .map_err(|e: String| ApiError::Validation(e))?;

    let member_repo = MemberRepository::new(state.pool.clone());
    let entity = member_repo
        .update_role(business_id, user_id, role)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?;

    info!(
        caller_id = %auth.user_id,
        business_id = %business_id,
        member_user_id = %user_id,
        role = %role,
        "Updated member role"
    );

    Ok(Json(domain::models::BusinessMember::from(entity)))
}

/// DELETE /api/v1/businesses/:business_id/members/:user_id
///
/// Removes a member. Self-removal ("leave team") needs no manage-team
/// permission; removing anyone else does. The owner can never be removed.
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(auth): Extension<UserAuth>,
    Path((business_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let team = TeamService::new(state.pool.clone());
    let business = team.load_business(business_id).await?;
    let caller_role = team.resolve_role(&business, auth.user_id).await?;

    let target_is_owner = user_id == business.owner_user_id;
    check_remove_member(auth.user_id, caller_role, user_id, target_is_owner).map_err(|e| {
        match e {
            RemovalRefusal::CannotRemoveOwner => {
                ApiError::InvariantViolation("The business owner cannot be removed".to_string())
            }
            RemovalRefusal::Forbidden => ApiError::Forbidden(
                "You do not have permission to remove other members".to_string(),
            ),
        }
    })?;

    let member_repo = MemberRepository::new(state.pool.clone());
    let removed = member_repo.delete(business_id, user_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    info!(
        caller_id = %auth.user_id,
        business_id = %business_id,
        member_user_id = %user_id,
        "Removed member"
    );

    Ok(StatusCode::NO_CONTENT)
}
