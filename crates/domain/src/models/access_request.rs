//! Business access-request domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::member::BusinessRole;

/// Access-request lifecycle states. Withdrawal deletes the row instead of
/// transitioning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessRequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl AccessRequestStatus {
    pub fn is_terminal(&self) -> bool {
        *self != AccessRequestStatus::Pending
    }
}

impl std::fmt::Display for AccessRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccessRequestStatus::Pending => write!(f, "pending"),
            AccessRequestStatus::Approved => write!(f, "approved"),
            AccessRequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A self-service proposal by a user to join a business at a requested role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BusinessAccessRequest {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub requested_role: BusinessRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: AccessRequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating an access request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateAccessRequestRequest {
    #[validate(custom(function = "shared::validation::validate_member_role"))]
    pub requested_role: String,

    #[validate(length(max = 500, message = "Message must be at most 500 characters"))]
    pub message: Option<String>,
}

/// Pending access request joined with requester identity, for review queues.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AccessRequestWithUser {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub requested_role: BusinessRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub status: AccessRequestStatus,
    pub created_at: DateTime<Utc>,
    pub email: String,
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_status_terminality() {
        assert!(!AccessRequestStatus::Pending.is_terminal());
        assert!(AccessRequestStatus::Approved.is_terminal());
        assert!(AccessRequestStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(AccessRequestStatus::Pending.to_string(), "pending");
        assert_eq!(AccessRequestStatus::Approved.to_string(), "approved");
        assert_eq!(AccessRequestStatus::Rejected.to_string(), "rejected");
    }

    #[test]
    fn test_create_request_validation() {
        let ok = CreateAccessRequestRequest {
            requested_role: "editor".to_string(),
            message: Some("I run the social accounts".to_string()),
        };
        assert!(ok.validate().is_ok());

        let bad_role = CreateAccessRequestRequest {
            requested_role: "owner".to_string(),
            message: None,
        };
        assert!(bad_role.validate().is_err());

        let long_message = CreateAccessRequestRequest {
            requested_role: "viewer".to_string(),
            message: Some("x".repeat(501)),
        };
        assert!(long_message.validate().is_err());
    }
}
