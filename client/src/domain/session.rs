//! Process-wide session state and capability predicates.
//!
//! A [`Session`] is an immutable snapshot. The session manager publishes a
//! new snapshot on every transition so readers always observe token, user,
//! and phase together.

use serde::Serialize;

use super::{AccessToken, ApprovalStatus, Role, User};

/// Lifecycle phase of the client session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Startup: the persisted token has not been confirmed yet.
    Initializing,
    /// No confirmed user.
    Unauthenticated,
    /// Token and user are both present and confirmed.
    Authenticated,
}

/// Client belief about who is signed in.
///
/// ## Invariants
/// - `phase == Authenticated` if and only if both token and user are present.
/// - A user is never present outside `Authenticated`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    phase: SessionPhase,
    token: Option<AccessToken>,
    user: Option<User>,
}

impl Session {
    /// Fresh process state before the token store has been read.
    pub fn initializing() -> Self {
        Self {
            phase: SessionPhase::Initializing,
            token: None,
            user: None,
        }
    }

    /// Still initializing, holding the persisted token while the user is
    /// being confirmed.
    pub fn resolving(token: AccessToken) -> Self {
        Self {
            phase: SessionPhase::Initializing,
            token: Some(token),
            user: None,
        }
    }

    /// Signed out.
    pub fn unauthenticated() -> Self {
        Self {
            phase: SessionPhase::Unauthenticated,
            token: None,
            user: None,
        }
    }

    /// Signed in with a confirmed user.
    pub fn authenticated(token: AccessToken, user: User) -> Self {
        Self {
            phase: SessionPhase::Authenticated,
            token: Some(token),
            user: Some(user),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Bearer token, if one is held.
    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    /// Confirmed user, present only when authenticated.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether the startup phase has not resolved yet.
    pub fn is_initializing(&self) -> bool {
        self.phase == SessionPhase::Initializing
    }

    /// `phase = authenticated`.
    pub fn is_authenticated(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }

    /// Signed-in user holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    /// Signed-in user holds the barangay role.
    pub fn is_barangay(&self) -> bool {
        self.role() == Some(Role::Barangay)
    }

    /// Admins, or barangay users the backend reported as approved.
    pub fn is_approved(&self) -> bool {
        match self.role() {
            Some(Role::Admin) => true,
            Some(Role::Barangay) => self.status() == Some(ApprovalStatus::Approved),
            None => false,
        }
    }

    /// Barangay user awaiting approval.
    pub fn is_pending(&self) -> bool {
        self.is_barangay() && self.status() == Some(ApprovalStatus::Pending)
    }

    /// Barangay user whose registration was rejected.
    pub fn is_rejected(&self) -> bool {
        self.is_barangay() && self.status() == Some(ApprovalStatus::Rejected)
    }

    fn role(&self) -> Option<Role> {
        self.user.as_ref().map(User::role)
    }

    fn status(&self) -> Option<ApprovalStatus> {
        self.user.as_ref().and_then(User::status)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::initializing()
    }
}


#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::fixtures::*;
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(signed_in(admin()), true)]
    #[case(signed_in(barangay(Some(ApprovalStatus::Approved))), true)]
    #[case(signed_in(barangay(Some(ApprovalStatus::Pending))), false)]
    #[case(signed_in(barangay(Some(ApprovalStatus::Rejected))), false)]
    #[case(signed_in(barangay(None)), false)]
    #[case(Session::unauthenticated(), false)]
    #[case(Session::initializing(), false)]
    #[case(Session::resolving(token()), false)]
    fn approval_requires_admin_or_approved_barangay(
        #[case] session: Session,
        #[case] expected: bool,
    ) {
        assert_eq!(session.is_approved(), expected);
    }

    #[rstest]
    fn pending_and_rejected_only_apply_to_barangay_users() {
        let pending = signed_in(barangay(Some(ApprovalStatus::Pending)));
        let rejected = signed_in(barangay(Some(ApprovalStatus::Rejected)));
        assert!(pending.is_pending() && !pending.is_rejected());
        assert!(rejected.is_rejected() && !rejected.is_pending());
        assert!(!signed_in(admin()).is_pending());
    }

    #[rstest]
    #[case(Session::unauthenticated())]
    #[case(Session::initializing())]
    #[case(Session::resolving(token()))]
    fn signed_out_sessions_answer_false_everywhere(#[case] session: Session) {
        assert!(!session.is_authenticated());
        assert!(!session.is_admin());
        assert!(!session.is_barangay());
        assert!(!session.is_approved());
        assert!(!session.is_pending());
        assert!(!session.is_rejected());
    }

    #[rstest]
    fn authenticated_phase_implies_token_and_user() {
        let session = signed_in(admin());
        assert_eq!(session.phase(), SessionPhase::Authenticated);
        assert!(session.token().is_some() && session.user().is_some());
    }
}
