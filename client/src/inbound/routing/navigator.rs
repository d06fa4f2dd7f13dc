//! Session-driven navigation.

use tokio::sync::watch;
use tracing::debug;

use super::{GuardState, RouteGuard, RouteTable};
use crate::domain::Session;

const MAX_REDIRECTS: usize = 4;

/// Binds a [`RouteTable`] to a session subscription and follows redirects.
///
/// Every decision reads the latest published session; nothing is cached
/// beyond the current evaluation.
#[derive(Debug)]
pub struct Navigator {
    table: RouteTable,
    sessions: watch::Receiver<Session>,
    path: String,
    guard: RouteGuard,
}

impl Navigator {
    /// Mount `path` and evaluate it against the current session.
    pub fn new(table: RouteTable, sessions: watch::Receiver<Session>, path: &str) -> Self {
        let guard = RouteGuard::new(table.resolve(path));
        let mut navigator = Self {
            table,
            sessions,
            path: path.to_owned(),
            guard,
        };
        navigator.sync();
        navigator
    }

    /// Path currently mounted, after any redirects.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// State of the mounted route.
    pub fn state(&self) -> GuardState {
        self.guard.state()
    }

    /// Not-found link for the mounted route, if it is the not-found page.
    pub fn call_to_action(&self) -> Option<&'static str> {
        self.guard.call_to_action(&self.sessions.borrow())
    }

    /// Navigate to `path`.
    pub fn navigate(&mut self, path: &str) -> GuardState {
        self.mount(path);
        self.sync()
    }

    /// Re-evaluate the mounted route against the latest session.
    pub fn sync(&mut self) -> GuardState {
        let session = self.sessions.borrow_and_update().clone();
        let mut hops = 0;
        loop {
            let state = self.guard.evaluate(&session);
            match state {
                GuardState::Redirecting { to } if hops < MAX_REDIRECTS && to != self.path => {
                    debug!(from = %self.path, to, "following redirect");
                    self.mount(to);
                    hops += 1;
                }
                other => return other,
            }
        }
    }

    /// Wait for the next session transition, then re-evaluate.
    ///
    /// Returns `None` once the session manager has been dropped.
    pub async fn session_changed(&mut self) -> Option<GuardState> {
        self.sessions.changed().await.ok()?;
        Some(self.sync())
    }

    fn mount(&mut self, path: &str) {
        self.path = path.to_owned();
        self.guard = RouteGuard::new(self.table.resolve(path));
    }
}
