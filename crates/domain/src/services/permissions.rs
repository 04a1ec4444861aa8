//! Permission gate: maps an effective role to capabilities.
//!
//! Authorization decisions live here, not in the storage layer. Handlers
//! resolve the caller's role once and consult this table.

use serde::Serialize;

use crate::models::member::{BusinessRole, EffectiveRole};

/// Gated actions on a business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    ManageTeam,
    Delete,
}

/// Whether a caller with `role` may perform `action`.
///
/// `None` (no relationship) is denied everything. Deletion is reserved for
/// the owner alone.
pub fn allows(role: Option<EffectiveRole>, action: Action) -> bool {
    let Some(role) = role else {
        return false;
    };

    match action {
        Action::View => true,
        Action::Edit => matches!(
            role,
            EffectiveRole::Owner
                | EffectiveRole::Member(BusinessRole::Admin)
                | EffectiveRole::Member(BusinessRole::Editor)
        ),
        Action::ManageTeam => matches!(
            role,
            EffectiveRole::Owner | EffectiveRole::Member(BusinessRole::Admin)
        ),
        Action::Delete => matches!(role, EffectiveRole::Owner),
    }
}

/// All four capability flags materialized at once, for UI consumption.
///
/// `role` is a display label only; when the caller has no relationship it
/// defaults to "viewer" while every flag stays false. Gating always uses the
/// flags, never the label.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PermissionSet {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_manage_team: bool,
    pub can_delete: bool,
    pub role: String,
}

impl PermissionSet {
    pub fn for_role(role: Option<EffectiveRole>) -> Self {
        Self {
            can_view: allows(role, Action::View),
            can_edit: allows(role, Action::Edit),
            can_manage_team: allows(role, Action::ManageTeam),
            can_delete: allows(role, Action::Delete),
            role: role.map_or("viewer", |r| r.label()).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_ACTIONS: [Action; 4] = [
        Action::View,
        Action::Edit,
        Action::ManageTeam,
        Action::Delete,
    ];

    fn member(role: BusinessRole) -> Option<EffectiveRole> {
        Some(EffectiveRole::Member(role))
    }

    #[test]
    fn test_no_relationship_denies_everything() {
        for action in ALL_ACTIONS {
            assert!(!allows(None, action));
        }
    }

    #[test]
    fn test_owner_allows_everything() {
        for action in ALL_ACTIONS {
            assert!(allows(Some(EffectiveRole::Owner), action));
        }
    }

    #[test]
    fn test_delete_is_owner_only() {
        assert!(allows(Some(EffectiveRole::Owner), Action::Delete));
        for role in [
            BusinessRole::Admin,
            BusinessRole::Editor,
            BusinessRole::Viewer,
        ] {
            assert!(!allows(member(role), Action::Delete));
        }
    }

    #[test]
    fn test_manage_team_is_owner_or_admin() {
        assert!(allows(Some(EffectiveRole::Owner), Action::ManageTeam));
        assert!(allows(member(BusinessRole::Admin), Action::ManageTeam));
        assert!(!allows(member(BusinessRole::Editor), Action::ManageTeam));
        assert!(!allows(member(BusinessRole::Viewer), Action::ManageTeam));
    }

    #[test]
    fn test_edit_excludes_viewer() {
        assert!(allows(member(BusinessRole::Admin), Action::Edit));
        assert!(allows(member(BusinessRole::Editor), Action::Edit));
        assert!(!allows(member(BusinessRole::Viewer), Action::Edit));
    }

    #[test]
    fn test_view_allows_any_role() {
        assert!(allows(Some(EffectiveRole::Owner), Action::View));
        for role in [
            BusinessRole::Admin,
            BusinessRole::Editor,
            BusinessRole::Viewer,
        ] {
            assert!(allows(member(role), Action::View));
        }
    }

    #[test]
    fn test_permission_set_for_owner() {
        let set = PermissionSet::for_role(Some(EffectiveRole::Owner));
        assert!(set.can_view && set.can_edit && set.can_manage_team && set.can_delete);
        assert_eq!(set.role, "owner");
    }

    #[test]
    fn test_permission_set_for_viewer() {
        let set = PermissionSet::for_role(member(BusinessRole::Viewer));
        assert!(set.can_view);
        assert!(!set.can_edit && !set.can_manage_team && !set.can_delete);
        assert_eq!(set.role, "viewer");
    }

    #[test]
    fn test_permission_set_for_stranger_defaults_label_only() {
        let set = PermissionSet::for_role(None);
        // The label defaults to viewer but carries no capability
        assert_eq!(set.role, "viewer");
        assert!(!set.can_view && !set.can_edit && !set.can_manage_team && !set.can_delete);
    }

    #[test]
    fn test_permission_set_matches_allows_for_all_roles() {
        let roles = [
            None,
            Some(EffectiveRole::Owner),
            member(BusinessRole::Admin),
            member(BusinessRole::Editor),
            member(BusinessRole::Viewer),
        ];
        for role in roles {
            let set = PermissionSet::for_role(role);
            assert_eq!(set.can_view, allows(role, Action::View));
            assert_eq!(set.can_edit, allows(role, Action::Edit));
            assert_eq!(set.can_manage_team, allows(role, Action::ManageTeam));
            assert_eq!(set.can_delete, allows(role, Action::Delete));
        }
    }
}
