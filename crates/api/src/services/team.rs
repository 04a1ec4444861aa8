//! Role resolution and permission enforcement for businesses.
//!
//! Handlers never query membership directly: they load the business through
//! this service, resolve the caller's effective role, and gate the operation
//! on the permission table in `domain::services::permissions`.

use domain::models::member::EffectiveRole;
use domain::services::permissions::{allows, Action};
use persistence::entities::BusinessEntity;
use persistence::repositories::{BusinessRepository, MemberRepository};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// Resolves effective roles and enforces permissions for one request.
pub struct TeamService {
    business_repo: BusinessRepository,
    member_repo: MemberRepository,
}

impl TeamService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            business_repo: BusinessRepository::new(pool.clone()),
            member_repo: MemberRepository::new(pool),
        }
    }

    /// Loads a business or fails NotFound.
    pub async fn load_business(&self, business_id: Uuid) -> Result<BusinessEntity, ApiError> {
        self.business_repo
            .find_by_id(business_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Business not found".to_string()))
    }

    /// Resolves the caller's effective role for a business.
    ///
    /// Ownership is checked first and always wins; only non-owners are looked
    /// up in the member table. `None` means no relationship at all.
    pub async fn resolve_role(
        &self,
        business: &BusinessEntity,
        user_id: Uuid,
    ) -> Result<Option<EffectiveRole>, ApiError> {
        if business.owner_user_id == user_id {
            return Ok(Some(EffectiveRole::Owner));
        }

        let member = self
            .member_repo
            .find_by_business_and_user(business.id, user_id)
            .await?;

        Ok(member.map(|m| EffectiveRole::Member(m.role.into())))
    }

    /// Resolves the caller's role and requires it to allow `action`.
    ///
    /// Returns the resolved role so handlers can make further decisions
    /// (e.g. the self-removal bypass) without a second lookup.
    pub async fn require(
        &self,
        business: &BusinessEntity,
        user_id: Uuid,
        action: Action,
    ) -> Result<Option<EffectiveRole>, ApiError> {
        let role = self.resolve_role(business, user_id).await?;
        if !allows(role, action) {
            return Err(ApiError::Forbidden(
                "You do not have permission to perform this action".to_string(),
            ));
        }
        Ok(role)
    }
}
