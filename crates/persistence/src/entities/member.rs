//! Business member entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for business_role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "business_role", rename_all = "lowercase")]
pub enum BusinessRoleDb {
    Admin,
    Editor,
    Viewer,
}

impl From<BusinessRoleDb> for domain::models::BusinessRole {
    fn from(db: BusinessRoleDb) -> Self {
        match db {
            BusinessRoleDb::Admin => Self::Admin,
            BusinessRoleDb::Editor => Self::Editor,
            BusinessRoleDb::Viewer => Self::Viewer,
        }
    }
}

impl From<domain::models::BusinessRole> for BusinessRoleDb {
    fn from(role: domain::models::BusinessRole) -> Self {
        match role {
            domain::models::BusinessRole::Admin => Self::Admin,
            domain::models::BusinessRole::Editor => Self::Editor,
            domain::models::BusinessRole::Viewer => Self::Viewer,
        }
    }
}

/// Database row mapping for the business_members table.
#[derive(Debug, Clone, FromRow)]
pub struct BusinessMemberEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub role: BusinessRoleDb,
    pub invited_by: Option<Uuid>,
    pub joined_at: DateTime<Utc>,
}

impl From<BusinessMemberEntity> for domain::models::BusinessMember {
    fn from(entity: BusinessMemberEntity) -> Self {
        Self {
            id: entity.id,
            business_id: entity.business_id,
            user_id: entity.user_id,
            role: entity.role.into(),
            invited_by: entity.invited_by,
            joined_at: entity.joined_at,
        }
    }
}

/// Member joined with user identity for team listings.
#[derive(Debug, Clone, FromRow)]
pub struct BusinessMemberWithUserEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub role: BusinessRoleDb,
    pub invited_by: Option<Uuid>,
    pub joined_at: DateTime<Utc>,
    // User details
    pub email: String,
    pub display_name: Option<String>,
}

impl From<BusinessMemberWithUserEntity> for domain::models::member::MemberWithUser {
    fn from(entity: BusinessMemberWithUserEntity) -> Self {
        Self {
            id: entity.id,
            business_id: entity.business_id,
            user_id: entity.user_id,
            role: entity.role.into(),
            invited_by: entity.invited_by,
            joined_at: entity.joined_at,
            email: entity.email,
            display_name: entity.display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::BusinessRole;

    #[test]
    fn test_role_db_roundtrip() {
        for role in [
            BusinessRole::Admin,
            BusinessRole::Editor,
            BusinessRole::Viewer,
        ] {
            let db: BusinessRoleDb = role.into();
            let back: BusinessRole = db.into();
            assert_eq!(back, role);
        }
    }
}
