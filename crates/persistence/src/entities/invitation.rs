//! Business invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::member::BusinessRoleDb;

/// Database enum for invitation_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
pub enum InvitationStatusDb {
    Pending,
    Accepted,
    Declined,
    Expired,
}

impl From<InvitationStatusDb> for domain::models::InvitationStatus {
    fn from(db: InvitationStatusDb) -> Self {
        match db {
            InvitationStatusDb::Pending => Self::Pending,
            InvitationStatusDb::Accepted => Self::Accepted,
            InvitationStatusDb::Declined => Self::Declined,
            InvitationStatusDb::Expired => Self::Expired,
        }
    }
}

impl From<domain::models::InvitationStatus> for InvitationStatusDb {
    fn from(status: domain::models::InvitationStatus) -> Self {
        match status {
            domain::models::InvitationStatus::Pending => Self::Pending,
            domain::models::InvitationStatus::Accepted => Self::Accepted,
            domain::models::InvitationStatus::Declined => Self::Declined,
            domain::models::InvitationStatus::Expired => Self::Expired,
        }
    }
}

/// Database row mapping for the business_invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct BusinessInvitationEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub email: String,
    pub role: BusinessRoleDb,
    pub invited_by: Option<Uuid>,
    pub token: String,
    pub status: InvitationStatusDb,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<BusinessInvitationEntity> for domain::models::BusinessInvitation {
    fn from(entity: BusinessInvitationEntity) -> Self {
        Self {
            id: entity.id,
            business_id: entity.business_id,
            email: entity.email,
            role: entity.role.into(),
            invited_by: entity.invited_by,
            token: entity.token,
            status: entity.status.into(),
            expires_at: entity.expires_at,
            created_at: entity.created_at,
        }
    }
}

/// Invitation joined with inviter identity and business summary for the
/// public acceptance page.
#[derive(Debug, Clone, FromRow)]
pub struct BusinessInvitationWithDetailsEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub email: String,
    pub role: BusinessRoleDb,
    pub invited_by: Option<Uuid>,
    pub status: InvitationStatusDb,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    // Business summary
    pub business_name: String,
    pub business_slug: String,
    // Inviter identity (absent when the inviter account was deleted)
    pub inviter_email: Option<String>,
    pub inviter_display_name: Option<String>,
}

impl From<BusinessInvitationWithDetailsEntity>
    for domain::models::invitation::InvitationWithDetails
{
    fn from(entity: BusinessInvitationWithDetailsEntity) -> Self {
        let invited_by = match (entity.invited_by, entity.inviter_email) {
            (Some(user_id), Some(email)) => Some(domain::models::invitation::InviterInfo {
                user_id,
                email,
                display_name: entity.inviter_display_name,
            }),
            _ => None,
        };

        Self {
            id: entity.id,
            email: entity.email,
            role: entity.role.into(),
            status: entity.status.into(),
            expires_at: entity.expires_at,
            created_at: entity.created_at,
            business: domain::models::business::BusinessSummary {
                id: entity.business_id,
                name: entity.business_name,
                slug: entity.business_slug,
            },
            invited_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::InvitationStatus;

    #[test]
    fn test_status_db_roundtrip() {
        for status in [
            InvitationStatus::Pending,
            InvitationStatus::Accepted,
            InvitationStatus::Declined,
            InvitationStatus::Expired,
        ] {
            let db: InvitationStatusDb = status.into();
            let back: InvitationStatus = db.into();
            assert_eq!(back, status);
        }
    }
}
