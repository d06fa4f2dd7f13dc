//! Capability policy: the route access decision table.
//!
//! [`decide`] is a pure function of the declared requirement and the current
//! session. It is total over every (requirement, phase, role, status)
//! combination.

use serde::{Deserialize, Serialize};

use super::Session;

/// Path of the login screen, the landing page for signed-out users.
pub const LOGIN_PATH: &str = "/";
/// Path of the role-specific dashboard.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Access level a route declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityRequirement {
    /// Anyone may view the route.
    Public,
    /// Any signed-in user.
    AnyAuthenticated,
    /// Signed-in administrators only.
    AdminOnly,
    /// Signed-in barangay users whose account is approved.
    ApprovedBarangayOnly,
}

impl CapabilityRequirement {
    /// Every requirement, for exhaustive checks.
    pub const ALL: [Self; 4] = [
        Self::Public,
        Self::AnyAuthenticated,
        Self::AdminOnly,
        Self::ApprovedBarangayOnly,
    ];
}

/// Outcome of evaluating a requirement against a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Render the route.
    Allow,
    /// Navigate to the given path instead.
    RedirectTo(&'static str),
    /// The session is still initializing; show a waiting state.
    Pending,
}

/// Decide whether `session` may view a route declaring `requirement`.
///
/// # Examples
/// ```
/// use portal_client::domain::{decide, CapabilityRequirement, Decision, Session};
///
/// let session = Session::unauthenticated();
/// assert_eq!(
///     decide(CapabilityRequirement::AdminOnly, &session),
///     Decision::RedirectTo("/"),
/// );
/// assert_eq!(
///     decide(CapabilityRequirement::Public, &Session::initializing()),
///     Decision::Pending,
/// );
/// ```
pub fn decide(requirement: CapabilityRequirement, session: &Session) -> Decision {
    if session.is_initializing() {
        return Decision::Pending;
    }

    let granted = match requirement {
        CapabilityRequirement::Public => return Decision::Allow,
        CapabilityRequirement::AnyAuthenticated => session.is_authenticated(),
        CapabilityRequirement::AdminOnly => session.is_authenticated() && session.is_admin(),
        CapabilityRequirement::ApprovedBarangayOnly => {
            session.is_authenticated() && session.is_barangay() && session.is_approved()
        }
    };

    if granted {
        Decision::Allow
    } else if session.is_authenticated() {
        Decision::RedirectTo(DASHBOARD_PATH)
    } else {
        Decision::RedirectTo(LOGIN_PATH)
    }
}

#[cfg(test)]
mod tests {
    //! Decision table coverage.
    use super::*;
    use crate::domain::ApprovalStatus;
    use crate::domain::session::fixtures::{admin, barangay, signed_in, token};
    use rstest::rstest;

    fn every_session() -> Vec<Session> {
        let mut sessions = vec![
            Session::initializing(),
            Session::resolving(token()),
            Session::unauthenticated(),
            signed_in(admin()),
            signed_in(barangay(None)),
        ];
        for status in [
            ApprovalStatus::Approved,
            ApprovalStatus::Pending,
            ApprovalStatus::Rejected,
        ] {
            sessions.push(signed_in(barangay(Some(status))));
        }
        sessions
    }

    #[rstest]
    fn initializing_sessions_always_wait() {
        for requirement in CapabilityRequirement::ALL {
            assert_eq!(
                decide(requirement, &Session::initializing()),
                Decision::Pending
            );
            assert_eq!(
                decide(requirement, &Session::resolving(token())),
                Decision::Pending
            );
        }
    }

    #[rstest]
    fn decisions_are_deterministic_and_well_formed() {
        for requirement in CapabilityRequirement::ALL {
            for session in every_session() {
                let first = decide(requirement, &session);
                assert_eq!(first, decide(requirement, &session.clone()));
                if let Decision::RedirectTo(path) = first {
                    assert!(path == LOGIN_PATH || path == DASHBOARD_PATH);
                }
            }
        }
    }

    #[rstest]
    #[case(CapabilityRequirement::Public, Session::unauthenticated(), Decision::Allow)]
    #[case(CapabilityRequirement::Public, signed_in(admin()), Decision::Allow)]
    #[case(
        CapabilityRequirement::AnyAuthenticated,
        Session::unauthenticated(),
        Decision::RedirectTo(LOGIN_PATH)
    )]
    #[case(
        CapabilityRequirement::AnyAuthenticated,
        signed_in(barangay(Some(ApprovalStatus::Rejected))),
        Decision::Allow
    )]
    #[case(
        CapabilityRequirement::AdminOnly,
        Session::unauthenticated(),
        Decision::RedirectTo(LOGIN_PATH)
    )]
    #[case(CapabilityRequirement::AdminOnly, signed_in(admin()), Decision::Allow)]
    #[case(
        CapabilityRequirement::AdminOnly,
        signed_in(barangay(Some(ApprovalStatus::Approved))),
        Decision::RedirectTo(DASHBOARD_PATH)
    )]
    #[case(
        CapabilityRequirement::ApprovedBarangayOnly,
        signed_in(barangay(Some(ApprovalStatus::Approved))),
        Decision::Allow
    )]
    #[case(
        CapabilityRequirement::ApprovedBarangayOnly,
        signed_in(barangay(Some(ApprovalStatus::Pending))),
        Decision::RedirectTo(DASHBOARD_PATH)
    )]
    #[case(
        CapabilityRequirement::ApprovedBarangayOnly,
        signed_in(barangay(None)),
        Decision::RedirectTo(DASHBOARD_PATH)
    )]
    #[case(
        CapabilityRequirement::ApprovedBarangayOnly,
        signed_in(admin()),
        Decision::RedirectTo(DASHBOARD_PATH)
    )]
    #[case(
        CapabilityRequirement::ApprovedBarangayOnly,
        Session::unauthenticated(),
        Decision::RedirectTo(LOGIN_PATH)
    )]
    fn decision_table(
        #[case] requirement: CapabilityRequirement,
        #[case] session: Session,
        #[case] expected: Decision,
    ) {
        assert_eq!(decide(requirement, &session), expected);
    }
}
