//! Per-route guard state machine.
//!
//! A guard starts in [`GuardState::Pending`] and is re-evaluated on every
//! session change or navigation. Once it has left `Pending` it never goes
//! back, even if handed an initializing session. The not-found class skips
//! the machine and always renders.

use tracing::debug;

use super::RouteAccess;
use crate::domain::{DASHBOARD_PATH, Decision, LOGIN_PATH, Session, decide};

/// Render state of the current route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardState {
    /// Waiting for the session to finish initializing.
    Pending,
    /// Leaving for another path.
    Redirecting {
        /// Redirect target.
        to: &'static str,
    },
    /// Showing the route's content.
    Rendering,
}

/// Guard for one mounted route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    access: RouteAccess,
    state: GuardState,
}

impl RouteGuard {
    /// Mount a guard for a route of the given access class.
    pub fn new(access: RouteAccess) -> Self {
        let state = match access {
            RouteAccess::NotFound => GuardState::Rendering,
            RouteAccess::Guarded(_) | RouteAccess::GuestOnly => GuardState::Pending,
        };
        Self { access, state }
    }

    /// Access class being guarded.
    pub fn access(&self) -> RouteAccess {
        self.access
    }

    /// Current state.
    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Re-evaluate against `session` and return the new state.
    pub fn evaluate(&mut self, session: &Session) -> GuardState {
        let next = target_state(self.access, session);
        if next == GuardState::Pending && self.state != GuardState::Pending {
            debug!(state = ?self.state, "ignoring pending session for a settled route");
            return self.state;
        }
        if next != self.state {
            debug!(from = ?self.state, to = ?next, access = ?self.access, "route guard transition");
            self.state = next;
        }
        self.state
    }

    /// Link offered by the not-found page; `None` for other routes.
    pub fn call_to_action(&self, session: &Session) -> Option<&'static str> {
        matches!(self.access, RouteAccess::NotFound).then(|| not_found_call_to_action(session))
    }
}

/// Where the not-found page sends the user, computed at render time.
pub fn not_found_call_to_action(session: &Session) -> &'static str {
    if session.is_authenticated() {
        DASHBOARD_PATH
    } else {
        LOGIN_PATH
    }
}

fn target_state(access: RouteAccess, session: &Session) -> GuardState {
    match access {
        RouteAccess::NotFound => GuardState::Rendering,
        RouteAccess::GuestOnly if session.is_initializing() => GuardState::Pending,
        RouteAccess::GuestOnly if session.is_authenticated() => GuardState::Redirecting {
            to: DASHBOARD_PATH,
        },
        RouteAccess::GuestOnly => GuardState::Rendering,
        RouteAccess::Guarded(requirement) => match decide(requirement, session) {
            Decision::Allow => GuardState::Rendering,
            Decision::RedirectTo(to) => GuardState::Redirecting { to },
            Decision::Pending => GuardState::Pending,
        },
    }
}
