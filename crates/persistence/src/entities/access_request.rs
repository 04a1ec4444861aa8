//! Business access-request entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::member::BusinessRoleDb;

/// Database enum for access_request_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "access_request_status", rename_all = "lowercase")]
pub enum AccessRequestStatusDb {
    Pending,
    Approved,
    Rejected,
}

impl From<AccessRequestStatusDb> for domain::models::AccessRequestStatus {
    fn from(db: AccessRequestStatusDb) -> Self {
        match db {
            AccessRequestStatusDb::Pending => Self::Pending,
            AccessRequestStatusDb::Approved => Self::Approved,
            AccessRequestStatusDb::Rejected => Self::Rejected,
        }
    }
}

impl From<domain::models::AccessRequestStatus> for AccessRequestStatusDb {
    fn from(status: domain::models::AccessRequestStatus) -> Self {
        match status {
            domain::models::AccessRequestStatus::Pending => Self::Pending,
            domain::models::AccessRequestStatus::Approved => Self::Approved,
            domain::models::AccessRequestStatus::Rejected => Self::Rejected,
        }
    }
}

/// Database row mapping for the business_access_requests table.
#[derive(Debug, Clone, FromRow)]
pub struct BusinessAccessRequestEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub requested_role: BusinessRoleDb,
    pub message: Option<String>,
    pub status: AccessRequestStatusDb,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<BusinessAccessRequestEntity> for domain::models::BusinessAccessRequest {
    fn from(entity: BusinessAccessRequestEntity) -> Self {
        Self {
            id: entity.id,
            business_id: entity.business_id,
            user_id: entity.user_id,
            requested_role: entity.requested_role.into(),
            message: entity.message,
            status: entity.status.into(),
            reviewed_by: entity.reviewed_by,
            reviewed_at: entity.reviewed_at,
            created_at: entity.created_at,
        }
    }
}

/// Access request joined with requester identity for review queues.
#[derive(Debug, Clone, FromRow)]
pub struct BusinessAccessRequestWithUserEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub requested_role: BusinessRoleDb,
    pub message: Option<String>,
    pub status: AccessRequestStatusDb,
    pub created_at: DateTime<Utc>,
    // User details
    pub email: String,
    pub display_name: Option<String>,
}

impl From<BusinessAccessRequestWithUserEntity>
    for domain::models::access_request::AccessRequestWithUser
{
    fn from(entity: BusinessAccessRequestWithUserEntity) -> Self {
        Self {
            id: entity.id,
            business_id: entity.business_id,
            user_id: entity.user_id,
            requested_role: entity.requested_role.into(),
            message: entity.message,
            status: entity.status.into(),
            created_at: entity.created_at,
            email: entity.email,
            display_name: entity.display_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::AccessRequestStatus;

    #[test]
    fn test_status_db_roundtrip() {
        for status in [
            AccessRequestStatus::Pending,
            AccessRequestStatus::Approved,
            AccessRequestStatus::Rejected,
        ] {
            let db: AccessRequestStatusDb = status.into();
            let back: AccessRequestStatus = db.into();
            assert_eq!(back, status);
        }
    }
}
