//! Business entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the businesses table.
#[derive(Debug, Clone, FromRow)]
pub struct BusinessEntity {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    pub slug: String,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BusinessEntity> for domain::models::Business {
    fn from(entity: BusinessEntity) -> Self {
        Self {
            id: entity.id,
            owner_user_id: entity.owner_user_id,
            name: entity.name,
            slug: entity.slug,
            industry: entity.industry,
            description: entity.description,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Business row joined with the caller's relationship label, for listings.
#[derive(Debug, Clone, FromRow)]
pub struct BusinessWithRoleEntity {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    pub slug: String,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// "owner" or the member role name.
    pub role: String,
}

impl From<BusinessWithRoleEntity> for domain::models::business::BusinessWithRole {
    fn from(entity: BusinessWithRoleEntity) -> Self {
        Self {
            business: domain::models::Business {
                id: entity.id,
                owner_user_id: entity.owner_user_id,
                name: entity.name,
                slug: entity.slug,
                industry: entity.industry,
                description: entity.description,
                created_at: entity.created_at,
                updated_at: entity.updated_at,
            },
            role: entity.role,
        }
    }
}
