//! Session-aware dashboard entry point.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{DashboardAggregator, DashboardView, UnreadCount};
use crate::domain::ports::{DashboardSource, GatewayError, NotificationCommand};
use crate::domain::{AccessToken, Error, Session, SessionManager};

const SIGN_IN_REQUIRED: &str = "Please sign in to view the dashboard.";
const SESSION_EXPIRED: &str = "Your session has expired. Please sign in again.";
const AWAITING_APPROVAL: &str = "Your account is awaiting approval by the municipal administrator.";
const ACCOUNT_REJECTED: &str = "Your registration was not approved.";

/// Unread notification badge, refreshed by polling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnreadBadge {
    /// Count to display; zero when the fetch failed.
    pub count: UnreadCount,
    /// The count could not be fetched and `count` is the fallback.
    pub stale: bool,
}

/// Loads the dashboard for whoever is currently signed in.
///
/// The session is read afresh on every call; nothing about the user is
/// cached between loads.
pub struct DashboardService {
    sessions: Arc<SessionManager>,
    aggregator: DashboardAggregator<dyn DashboardSource>,
    notifications: Arc<dyn NotificationCommand>,
}

impl DashboardService {
    /// Wire the service to its collaborators.
    pub fn new(
        sessions: Arc<SessionManager>,
        aggregator: DashboardAggregator<dyn DashboardSource>,
        notifications: Arc<dyn NotificationCommand>,
    ) -> Self {
        Self {
            sessions,
            aggregator,
            notifications,
        }
    }

    /// Load the dashboard variant matching the signed-in user's role.
    ///
    /// Source failures never fail the load; they mark the view as a partial
    /// failure. The exception is an expired token: the session is reset and
    /// the load reports `Unauthorized`.
    pub async fn load(&self) -> Result<DashboardView, Error> {
        let session = self.sessions.session();
        let token = authorized_token(&session)?;

        let view = if session.is_admin() {
            DashboardView::Admin(self.aggregator.admin(&token).await)
        } else {
            DashboardView::Barangay(self.aggregator.barangay(&token).await)
        };

        if view.auth_expired() {
            self.sessions
                .expire_token(&token, "dashboard source rejected the token")
                .await;
            return Err(Error::unauthorized(SESSION_EXPIRED));
        }
        Ok(view)
    }

    /// Mark one notification as read. Returns whether the backend accepted
    /// it; the caller removes the item from its view on `true`.
    pub async fn mark_notification_as_read(&self, notification_id: u64) -> bool {
        let Some(token) = self.sessions.session().token().cloned() else {
            return false;
        };
        match self.notifications.mark_read(&token, notification_id).await {
            Ok(()) => {
                debug!(notification_id, "notification marked as read");
                true
            }
            Err(error) => {
                self.note_failure(&token, &error, "mark notification as read")
                    .await;
                false
            }
        }
    }

    /// Poll the unread notification count. Never fails.
    pub async fn unread_count(&self) -> UnreadBadge {
        let Some(token) = self.sessions.session().token().cloned() else {
            return UnreadBadge {
                count: UnreadCount::default(),
                stale: true,
            };
        };
        match self.aggregator.source().unread_count(&token).await {
            Ok(count) => UnreadBadge {
                count,
                stale: false,
            },
            Err(error) => {
                self.note_failure(&token, &error, "unread count").await;
                UnreadBadge {
                    count: UnreadCount::default(),
                    stale: true,
                }
            }
        }
    }

    async fn note_failure(&self, token: &AccessToken, error: &GatewayError, action: &str) {
        warn!(action, error = %error, "notification request failed");
        if error.is_auth_failure() {
            self.sessions
                .expire_token(token, "notification request rejected the token")
                .await;
        }
    }
}

fn authorized_token(session: &Session) -> Result<AccessToken, Error> {
    let Some(token) = session.token().filter(|_| session.is_authenticated()) else {
        return Err(Error::unauthorized(SIGN_IN_REQUIRED));
    };
    if session.is_pending() {
        info!("dashboard refused: account pending approval");
        return Err(Error::forbidden(AWAITING_APPROVAL));
    }
    if !session.is_approved() {
        info!("dashboard refused: account not approved");
        return Err(Error::forbidden(ACCOUNT_REJECTED));
    }
    Ok(token.clone())
}
