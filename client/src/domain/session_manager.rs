//! Session manager: the single owner of authentication state.
//!
//! The manager hydrates from the token store at startup, performs login,
//! logout, and forced expiry, and publishes every transition to subscribers
//! through a `tokio::sync::watch` channel. Each published [`Session`] swaps
//! token, user, and phase together, so no reader can observe a half-applied
//! transition. Transitions are serialized by an async lock.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::domain::ports::{AuthGateway, TokenStore};
use crate::domain::{
    AccessToken, Error, LoginCredentials, RegistrationForm, RegistrationReceipt, Session, User,
};

const PERSIST_FAILED: &str = "Signed in, but the session could not be saved. Please try again.";

/// Owner of the process-wide [`Session`].
pub struct SessionManager {
    auth: Arc<dyn AuthGateway>,
    store: Arc<dyn TokenStore>,
    state: watch::Sender<Session>,
    transition: Mutex<()>,
}

impl SessionManager {
    /// Create a manager in the `initializing` phase.
    pub fn new(auth: Arc<dyn AuthGateway>, store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(Session::initializing());
        Self {
            auth,
            store,
            state,
            transition: Mutex::new(()),
        }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Register for session change notifications.
    ///
    /// The receiver's current value is the latest session; every transition
    /// marks it changed.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Wait until the startup phase has resolved.
    pub async fn ready(&self) -> Session {
        let mut receiver = self.state.subscribe();
        match receiver.wait_for(|session| !session.is_initializing()).await {
            Ok(session) => session.clone(),
            Err(_) => self.session(),
        }
    }

    /// Hydrate from the token store.
    ///
    /// Resolves the phase to `authenticated` only after the backend
    /// confirmed the user behind the persisted token. Any failure on the way
    /// (store error, malformed token, rejected token, network failure) clears
    /// the slot and resolves to `unauthenticated`. Runs at most once; later
    /// calls return the current session.
    pub async fn initialize(&self) -> Session {
        let _guard = self.transition.lock().await;
        if !self.state.borrow().is_initializing() {
            return self.session();
        }

        let raw = match self.store.load().await {
            Ok(raw) => raw,
            Err(error) => {
                warn!(error = %error, "token store unreadable; starting signed out");
                return self.reset().await;
            }
        };
        let Some(raw) = raw else {
            debug!("no persisted token; starting signed out");
            return self.publish(Session::unauthenticated());
        };
        let token = match AccessToken::parse(&raw) {
            Ok(token) => token,
            Err(error) => {
                warn!(error = %error, "persisted token is malformed; clearing it");
                return self.reset().await;
            }
        };

        self.publish(Session::resolving(token.clone()));
        match self.auth.current_user(&token).await {
            Ok(user) => {
                info!(user_id = %user.id(), role = ?user.role(), "restored persisted session");
                self.publish(Session::authenticated(token, user))
            }
            Err(error) => {
                warn!(error = %error, "could not confirm persisted session; signing out");
                self.reset().await
            }
        }
    }

    /// Sign in with e-mail and password.
    ///
    /// On failure the previous session, signed in or not, is left untouched
    /// and the error carries a user-facing reason.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, Error> {
        let credentials = LoginCredentials::try_from_parts(email, password)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.login_with(&credentials).await
    }

    async fn login_with(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let _guard = self.transition.lock().await;
        let grant = self.auth.login(credentials).await.map_err(|error| {
            info!(error = %error, "login rejected");
            Error::from(error)
        })?;

        self.store.save(&grant.token).await.map_err(|error| {
            warn!(error = %error, "could not persist access token");
            Error::internal(PERSIST_FAILED)
        })?;

        info!(user_id = %grant.user.id(), role = ?grant.user.role(), "signed in");
        let user = grant.user.clone();
        self.publish(Session::authenticated(grant.token, grant.user));
        Ok(user)
    }

    /// Sign out. Safe to call when already signed out.
    ///
    /// The in-memory session is always reset; the error only reports that
    /// the persisted slot could not be cleared.
    pub async fn logout(&self) -> Result<(), Error> {
        let _guard = self.transition.lock().await;
        let cleared = self.clear_store().await;
        self.publish(Session::unauthenticated());
        info!("signed out");
        cleared
    }

    /// Forced reset after an API call reported `token` as invalid.
    ///
    /// Only acts while `token` is still the current credential: results from
    /// a request issued before a re-login must not end the newer session, and
    /// a signed-out session is left alone.
    pub async fn expire_token(&self, token: &AccessToken, reason: &str) {
        let _guard = self.transition.lock().await;
        if self.state.borrow().token() != Some(token) {
            debug!(reason, "ignoring expiry for a superseded token");
            return;
        }
        warn!(reason, "session expired; signing out");
        self.reset().await;
    }

    /// Submit a registration. Never changes the session.
    pub async fn register(&self, form: &RegistrationForm) -> Result<RegistrationReceipt, Error> {
        form.validate()?;
        let ack = self.auth.register(form).await.map_err(|error| {
            info!(error = %error, "registration rejected");
            Error::from(error)
        })?;
        info!("registration accepted");
        Ok(RegistrationReceipt {
            message: ack.message,
            signed_in: None,
        })
    }

    /// Register, then sign in with the same credentials.
    ///
    /// The sign-in is a secondary step: its failure is logged and reported
    /// as `signed_in: None`, never as a registration failure.
    pub async fn register_and_sign_in(
        &self,
        form: &RegistrationForm,
    ) -> Result<RegistrationReceipt, Error> {
        let mut receipt = self.register(form).await?;
        let credentials = form.credentials()?;
        match self.login_with(&credentials).await {
            Ok(user) => receipt.signed_in = Some(user),
            Err(error) => info!(error = %error, "sign-in after registration did not succeed"),
        }
        Ok(receipt)
    }

    async fn clear_store(&self) -> Result<(), Error> {
        self.store.clear().await.map_err(|error| {
            warn!(error = %error, "could not clear persisted token");
            Error::internal("The saved session could not be removed from this device.")
        })
    }

    async fn reset(&self) -> Session {
        // The in-memory reset must happen even when the slot cannot be cleared.
        if let Err(error) = self.clear_store().await {
            debug!(error = %error, "resetting the session with a stale token slot");
        }
        self.publish(Session::unauthenticated())
    }

    fn publish(&self, session: Session) -> Session {
        debug!(phase = ?session.phase(), "session transition");
        self.state.send_replace(session.clone());
        session
    }
}

#[cfg(test)]
#[path = "session_manager_tests.rs"]
mod tests;
