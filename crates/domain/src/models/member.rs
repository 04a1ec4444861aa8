//! Business membership domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Explicit membership roles on a business.
///
/// Ownership is not a membership role: the owner is recorded on the business
/// row itself and never appears in `business_members`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessRole {
    Admin,
    Editor,
    Viewer,
}

impl FromStr for BusinessRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(BusinessRole::Admin),
            "editor" => Ok(BusinessRole::Editor),
            "viewer" => Ok(BusinessRole::Viewer),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for BusinessRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusinessRole::Admin => write!(f, "admin"),
            BusinessRole::Editor => write!(f, "editor"),
            BusinessRole::Viewer => write!(f, "viewer"),
        }
    }
}

/// A user's effective relationship to a business.
///
/// Ownership is checked first and always wins; the storage layer never holds
/// a member row for the owner, so the two variants are mutually exclusive for
/// any (business, user) pair. "No relationship" is `Option::None` at call
/// sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveRole {
    Owner,
    Member(BusinessRole),
}

impl EffectiveRole {
    pub fn is_owner(&self) -> bool {
        matches!(self, EffectiveRole::Owner)
    }

    /// Display label, e.g. for membership listings.
    pub fn label(&self) -> &'static str {
        match self {
            EffectiveRole::Owner => "owner",
            EffectiveRole::Member(BusinessRole::Admin) => "admin",
            EffectiveRole::Member(BusinessRole::Editor) => "editor",
            EffectiveRole::Member(BusinessRole::Viewer) => "viewer",
        }
    }
}

/// Business membership domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BusinessMember {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub role: BusinessRole,
    pub invited_by: Option<Uuid>,
    pub joined_at: DateTime<Utc>,
}

/// Membership joined with user identity for team listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberWithUser {
    pub id: Uuid,
    pub business_id: Uuid,
    pub user_id: Uuid,
    pub role: BusinessRole,
    pub invited_by: Option<Uuid>,
    pub joined_at: DateTime<Utc>,
    pub email: String,
    pub display_name: Option<String>,
}

/// Owner identity included alongside member listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct OwnerSummary {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
}

/// Request to change a member's role.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateMemberRoleRequest {
    #[validate(custom(function = "shared::validation::validate_member_role"))]
    pub role: String,
}

/// Response for team listings: members plus the implicit owner.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TeamResponse {
    pub owner: OwnerSummary,
    pub members: Vec<MemberWithUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!("admin".parse::<BusinessRole>(), Ok(BusinessRole::Admin));
        assert_eq!("Editor".parse::<BusinessRole>(), Ok(BusinessRole::Editor));
        assert_eq!("VIEWER".parse::<BusinessRole>(), Ok(BusinessRole::Viewer));
        assert!("owner".parse::<BusinessRole>().is_err());
        assert!("".parse::<BusinessRole>().is_err());
    }

    #[test]
    fn test_role_display_roundtrip() {
        for role in [
            BusinessRole::Admin,
            BusinessRole::Editor,
            BusinessRole::Viewer,
        ] {
            assert_eq!(role.to_string().parse::<BusinessRole>(), Ok(role));
        }
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&BusinessRole::Admin).unwrap(),
            "\"admin\""
        );
        let role: BusinessRole = serde_json::from_str("\"viewer\"").unwrap();
        assert_eq!(role, BusinessRole::Viewer);
    }

    #[test]
    fn test_effective_role_labels() {
        assert_eq!(EffectiveRole::Owner.label(), "owner");
        assert_eq!(EffectiveRole::Member(BusinessRole::Editor).label(), "editor");
        assert!(EffectiveRole::Owner.is_owner());
        assert!(!EffectiveRole::Member(BusinessRole::Admin).is_owner());
    }
}
