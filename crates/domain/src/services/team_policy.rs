//! State-transition guards for the team subsystem.
//!
//! Every decision here is pure: handlers resolve the current row and caller
//! identity, ask this module what to do, then perform the storage writes it
//! prescribes. Keeping the guards free of I/O makes the lifecycle rules of
//! invitations, access requests and member removal directly testable.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::access_request::{AccessRequestStatus, BusinessAccessRequest};
use crate::models::invitation::{BusinessInvitation, InvitationStatus};
use crate::models::member::EffectiveRole;
use crate::services::permissions::{allows, Action};

/// Reasons an invitation transition is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvitationRefusal {
    /// The invitation already reached a terminal status.
    #[error("Invitation is no longer valid")]
    NoLongerValid,

    /// The invitation passed its expiry; the status flip to `expired` must
    /// be persisted before failing.
    #[error("Invitation has expired")]
    Expired,

    /// The authenticated email does not match the invited address.
    #[error("Invitation was issued for a different email address")]
    EmailMismatch,
}

/// What a token redemption attempt should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationDecision {
    /// Perform the transition (membership insert + status flip for accept,
    /// status flip for decline).
    Proceed,
    /// Persist `expired`, then fail with [`InvitationRefusal::Expired`].
    /// The expiry transition is permanent even though the call fails.
    ExpireThenRefuse,
    /// Fail without any write.
    Refuse(InvitationRefusal),
}

/// Guard for `acceptInvitation`.
///
/// Check order: terminal status, expiry, email match. A second redemption of
/// an already-expired token therefore fails `NoLongerValid`, not `Expired`.
pub fn check_accept(
    invitation: &BusinessInvitation,
    authenticated_email: &str,
    now: DateTime<Utc>,
) -> InvitationDecision {
    if invitation.status != InvitationStatus::Pending {
        return InvitationDecision::Refuse(InvitationRefusal::NoLongerValid);
    }
    if invitation.is_expired_at(now) {
        return InvitationDecision::ExpireThenRefuse;
    }
    if !emails_match(&invitation.email, authenticated_email) {
        return InvitationDecision::Refuse(InvitationRefusal::EmailMismatch);
    }
    InvitationDecision::Proceed
}

/// Guard for `declineInvitation`.
///
/// Symmetric with accept: only a pending, unexpired invitation can be
/// declined. No email check, declining is open to whoever holds the token.
pub fn check_decline(invitation: &BusinessInvitation, now: DateTime<Utc>) -> InvitationDecision {
    if invitation.status != InvitationStatus::Pending {
        return InvitationDecision::Refuse(InvitationRefusal::NoLongerValid);
    }
    if invitation.is_expired_at(now) {
        return InvitationDecision::ExpireThenRefuse;
    }
    InvitationDecision::Proceed
}

/// Email comparison for invitation acceptance.
///
/// Case-insensitive. This is the single override point should exact matching
/// ever be required.
pub fn emails_match(invited: &str, authenticated: &str) -> bool {
    invited.eq_ignore_ascii_case(authenticated)
}

/// Reasons an access-request review is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReviewRefusal {
    /// The request already reached a terminal status. Applies to both
    /// approve and reject.
    #[error("Access request has already been reviewed")]
    AlreadyReviewed,
}

/// Guard for `approveAccessRequest` and `rejectAccessRequest`.
pub fn check_review(request: &BusinessAccessRequest) -> Result<(), ReviewRefusal> {
    if request.status != AccessRequestStatus::Pending {
        return Err(ReviewRefusal::AlreadyReviewed);
    }
    Ok(())
}

/// Reasons a withdrawal is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WithdrawRefusal {
    #[error("Access request belongs to another user")]
    NotOwnRequest,
}

/// Guard for `withdrawAccessRequest`: only the requester may withdraw.
pub fn check_withdraw(
    request: &BusinessAccessRequest,
    caller_id: Uuid,
) -> Result<(), WithdrawRefusal> {
    if request.user_id != caller_id {
        return Err(WithdrawRefusal::NotOwnRequest);
    }
    Ok(())
}

/// Reasons a member removal is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RemovalRefusal {
    /// The target is the business owner. Fails regardless of caller.
    #[error("The business owner cannot be removed")]
    CannotRemoveOwner,

    /// The caller is neither the target nor allowed to manage the team.
    #[error("Caller may not remove other members")]
    Forbidden,
}

/// Guard for `removeMember`.
///
/// Self-removal ("leave team") bypasses the manage-team check entirely;
/// removing anyone else requires it. The owner guard runs first and wins.
pub fn check_remove_member(
    caller_id: Uuid,
    caller_role: Option<EffectiveRole>,
    target_id: Uuid,
    target_is_owner: bool,
) -> Result<(), RemovalRefusal> {
    if target_is_owner {
        return Err(RemovalRefusal::CannotRemoveOwner);
    }
    if caller_id == target_id {
        return Ok(());
    }
    if !allows(caller_role, Action::ManageTeam) {
        return Err(RemovalRefusal::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::member::BusinessRole;
    use chrono::Duration;

    fn invitation(status: InvitationStatus, expires_in: Duration) -> BusinessInvitation {
        BusinessInvitation {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            email: "bob@example.com".to_string(),
            role: BusinessRole::Viewer,
            invited_by: Some(Uuid::new_v4()),
            token: "c".repeat(64),
            status,
            expires_at: Utc::now() + expires_in,
            created_at: Utc::now(),
        }
    }

    fn request(status: AccessRequestStatus, user_id: Uuid) -> BusinessAccessRequest {
        BusinessAccessRequest {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            user_id,
            requested_role: BusinessRole::Editor,
            message: None,
            status,
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
        }
    }

    // Invitation accept

    #[test]
    fn test_accept_pending_fresh_matching_email() {
        let invitation = invitation(InvitationStatus::Pending, Duration::days(7));
        let decision = check_accept(&invitation, "bob@example.com", Utc::now());
        assert_eq!(decision, InvitationDecision::Proceed);
    }

    #[test]
    fn test_accept_email_match_is_case_insensitive() {
        let invitation = invitation(InvitationStatus::Pending, Duration::days(7));
        let decision = check_accept(&invitation, "Bob@Example.COM", Utc::now());
        assert_eq!(decision, InvitationDecision::Proceed);
    }

    #[test]
    fn test_accept_email_mismatch_refuses_without_write() {
        let invitation = invitation(InvitationStatus::Pending, Duration::days(7));
        let decision = check_accept(&invitation, "mallory@example.com", Utc::now());
        assert_eq!(
            decision,
            InvitationDecision::Refuse(InvitationRefusal::EmailMismatch)
        );
    }

    #[test]
    fn test_accept_expired_pending_flips_then_fails() {
        let invitation = invitation(InvitationStatus::Pending, Duration::days(-1));
        let decision = check_accept(&invitation, "bob@example.com", Utc::now());
        assert_eq!(decision, InvitationDecision::ExpireThenRefuse);
    }

    #[test]
    fn test_accept_after_expiry_transition_is_no_longer_valid() {
        // Second redemption: the status already reads expired, so the
        // refusal changes from Expired to NoLongerValid.
        let invitation = invitation(InvitationStatus::Expired, Duration::days(-1));
        let decision = check_accept(&invitation, "bob@example.com", Utc::now());
        assert_eq!(
            decision,
            InvitationDecision::Refuse(InvitationRefusal::NoLongerValid)
        );
    }

    #[test]
    fn test_accept_terminal_statuses_refused() {
        for status in [
            InvitationStatus::Accepted,
            InvitationStatus::Declined,
            InvitationStatus::Expired,
        ] {
            let invitation = invitation(status, Duration::days(7));
            let decision = check_accept(&invitation, "bob@example.com", Utc::now());
            assert_eq!(
                decision,
                InvitationDecision::Refuse(InvitationRefusal::NoLongerValid)
            );
        }
    }

    #[test]
    fn test_status_guard_runs_before_email_guard() {
        let invitation = invitation(InvitationStatus::Accepted, Duration::days(7));
        let decision = check_accept(&invitation, "mallory@example.com", Utc::now());
        assert_eq!(
            decision,
            InvitationDecision::Refuse(InvitationRefusal::NoLongerValid)
        );
    }

    // Invitation decline

    #[test]
    fn test_decline_pending_proceeds() {
        let invitation = invitation(InvitationStatus::Pending, Duration::days(7));
        assert_eq!(
            check_decline(&invitation, Utc::now()),
            InvitationDecision::Proceed
        );
    }

    #[test]
    fn test_decline_accepted_is_refused() {
        let invitation = invitation(InvitationStatus::Accepted, Duration::days(7));
        assert_eq!(
            check_decline(&invitation, Utc::now()),
            InvitationDecision::Refuse(InvitationRefusal::NoLongerValid)
        );
    }

    #[test]
    fn test_decline_expired_pending_flips_then_fails() {
        let invitation = invitation(InvitationStatus::Pending, Duration::hours(-1));
        assert_eq!(
            check_decline(&invitation, Utc::now()),
            InvitationDecision::ExpireThenRefuse
        );
    }

    // Access-request review

    #[test]
    fn test_review_pending_is_allowed() {
        let request = request(AccessRequestStatus::Pending, Uuid::new_v4());
        assert!(check_review(&request).is_ok());
    }

    #[test]
    fn test_review_terminal_fails_already_reviewed() {
        for status in [AccessRequestStatus::Approved, AccessRequestStatus::Rejected] {
            let request = request(status, Uuid::new_v4());
            assert_eq!(check_review(&request), Err(ReviewRefusal::AlreadyReviewed));
        }
    }

    // Withdraw

    #[test]
    fn test_withdraw_own_request() {
        let user_id = Uuid::new_v4();
        let request = request(AccessRequestStatus::Pending, user_id);
        assert!(check_withdraw(&request, user_id).is_ok());
    }

    #[test]
    fn test_withdraw_foreign_request_refused() {
        let request = request(AccessRequestStatus::Pending, Uuid::new_v4());
        assert_eq!(
            check_withdraw(&request, Uuid::new_v4()),
            Err(WithdrawRefusal::NotOwnRequest)
        );
    }

    // Member removal

    #[test]
    fn test_remove_owner_always_fails() {
        let owner_id = Uuid::new_v4();
        // Even the owner acting on themself hits the owner guard
        for (caller, role) in [
            (owner_id, Some(EffectiveRole::Owner)),
            (Uuid::new_v4(), Some(EffectiveRole::Member(BusinessRole::Admin))),
        ] {
            assert_eq!(
                check_remove_member(caller, role, owner_id, true),
                Err(RemovalRefusal::CannotRemoveOwner)
            );
        }
    }

    #[test]
    fn test_self_removal_needs_no_manage_team() {
        let viewer_id = Uuid::new_v4();
        let result = check_remove_member(
            viewer_id,
            Some(EffectiveRole::Member(BusinessRole::Viewer)),
            viewer_id,
            false,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_viewer_cannot_remove_another_member() {
        let result = check_remove_member(
            Uuid::new_v4(),
            Some(EffectiveRole::Member(BusinessRole::Viewer)),
            Uuid::new_v4(),
            false,
        );
        assert_eq!(result, Err(RemovalRefusal::Forbidden));
    }

    #[test]
    fn test_admin_and_owner_can_remove_members() {
        for role in [
            Some(EffectiveRole::Owner),
            Some(EffectiveRole::Member(BusinessRole::Admin)),
        ] {
            let result = check_remove_member(Uuid::new_v4(), role, Uuid::new_v4(), false);
            assert!(result.is_ok());
        }
    }

    #[test]
    fn test_emails_match_override_point() {
        assert!(emails_match("bob@example.com", "BOB@EXAMPLE.COM"));
        assert!(!emails_match("bob@example.com", "bob+kit@example.com"));
    }
}
