//! Business invitation domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::business::BusinessSummary;
use super::member::BusinessRole;

/// Invitation lifecycle states. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
}

impl InvitationStatus {
    pub fn is_terminal(&self) -> bool {
        *self != InvitationStatus::Pending
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvitationStatus::Pending => write!(f, "pending"),
            InvitationStatus::Accepted => write!(f, "accepted"),
            InvitationStatus::Declined => write!(f, "declined"),
            InvitationStatus::Expired => write!(f, "expired"),
        }
    }
}

/// A token-addressed, time-boxed proposal for an email to join at a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BusinessInvitation {
    pub id: Uuid,
    pub business_id: Uuid,
    pub email: String,
    pub role: BusinessRole,
    pub invited_by: Option<Uuid>,
    /// Opaque lookup key for the public acceptance flow. Never logged.
    pub token: String,
    pub status: InvitationStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl BusinessInvitation {
    /// Whether the invitation is past its expiry at `now`.
    ///
    /// Expiry is lazy: nothing flips the status until a redemption attempt
    /// observes it.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Request to invite an email address to a business.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvitationRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_member_role"))]
    pub role: String,
}

/// Response after creating an invitation. The token is shown only here.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvitationResponse {
    pub id: Uuid,
    pub business_id: Uuid,
    pub email: String,
    pub role: BusinessRole,
    pub token: String,
    pub status: InvitationStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Inviter identity for invitation lookups.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InviterInfo {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
}

/// Invitation joined with inviter identity and business summary,
/// served to the public acceptance page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationWithDetails {
    pub id: Uuid,
    pub email: String,
    pub role: BusinessRole,
    pub status: InvitationStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub business: BusinessSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited_by: Option<InviterInfo>,
}

/// Summary of an invitation for team-management listings (token omitted).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InvitationSummary {
    pub id: Uuid,
    pub email: String,
    pub role: BusinessRole,
    pub status: InvitationStatus,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn invitation(status: InvitationStatus, expires_at: DateTime<Utc>) -> BusinessInvitation {
        BusinessInvitation {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            email: "bob@example.com".to_string(),
            role: BusinessRole::Viewer,
            invited_by: Some(Uuid::new_v4()),
            token: "a".repeat(64),
            status,
            expires_at,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_terminality() {
        assert!(!InvitationStatus::Pending.is_terminal());
        assert!(InvitationStatus::Accepted.is_terminal());
        assert!(InvitationStatus::Declined.is_terminal());
        assert!(InvitationStatus::Expired.is_terminal());
    }

    #[test]
    fn test_is_expired_at() {
        let now = Utc::now();
        let fresh = invitation(InvitationStatus::Pending, now + Duration::days(7));
        let stale = invitation(InvitationStatus::Pending, now - Duration::hours(1));
        assert!(!fresh.is_expired_at(now));
        assert!(stale.is_expired_at(now));
    }

    #[test]
    fn test_expiry_boundary_is_not_expired() {
        let now = Utc::now();
        let boundary = invitation(InvitationStatus::Pending, now);
        // Exactly at expires_at the token is still redeemable
        assert!(!boundary.is_expired_at(now));
    }

    #[test]
    fn test_create_request_validation() {
        use validator::Validate;

        let ok = CreateInvitationRequest {
            email: "bob@example.com".to_string(),
            role: "viewer".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad_email = CreateInvitationRequest {
            email: "not-an-email".to_string(),
            role: "viewer".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let bad_role = CreateInvitationRequest {
            email: "bob@example.com".to_string(),
            role: "owner".to_string(),
        };
        assert!(bad_role.validate().is_err());
    }
}
