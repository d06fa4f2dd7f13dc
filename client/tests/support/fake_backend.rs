//! In-process portal backend double.
//!
//! Implements every backend port against in-memory state so behaviour
//! tests can drive the session manager and dashboard service without a
//! network.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use portal_client::domain::dashboard::{
    AnalyticsSummary, BarangayPopulation, Incident, IncidentStats, Notification,
    PendingUsersCount, PopulationOverview, UnreadCount,
};
use portal_client::domain::ports::{
    AuthGateway, DashboardSource, GatewayError, NotificationCommand,
};
use portal_client::domain::{
    AccessToken, ApprovalStatus, LoginCredentials, LoginGrant, RegistrationAck, RegistrationForm,
    Role, User, UserId,
};

/// Build a barangay user with the given approval status.
pub fn barangay_user(email: &str, status: ApprovalStatus) -> User {
    User::builder(UserId::new("2").expect("id"), email, Role::Barangay)
        .name("Barangay Captain")
        .barangay_name("San Isidro")
        .status(status)
        .build()
        .expect("valid user")
}

/// Build a municipal administrator.
pub fn admin_user(email: &str) -> User {
    User::builder(UserId::new("1").expect("id"), email, Role::Admin)
        .name("Municipal Admin")
        .build()
        .expect("valid user")
}

#[derive(Default)]
struct State {
    accounts: HashMap<String, (String, User)>,
    tokens: HashMap<String, User>,
    failing: BTreeSet<&'static str>,
    issued: u64,
}

/// Scripted backend with accounts, issued tokens, and failing sources.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("fake backend lock")
    }

    /// Register an account that can sign in with `password`.
    pub fn add_account(&self, password: &str, user: User) {
        self.state()
            .accounts
            .insert(user.email().to_owned(), (password.to_owned(), user));
    }

    /// Issue a token for an existing account without a login call.
    pub fn issue_token(&self, email: &str) -> String {
        let mut state = self.state();
        let user = state.accounts.get(email).expect("known account").1.clone();
        state.issued += 1;
        let token = format!("{}|fake-token", state.issued);
        state.tokens.insert(token.clone(), user);
        token
    }

    /// Invalidate every issued token.
    pub fn revoke_all(&self) {
        self.state().tokens.clear();
    }

    /// Make the named source answer with HTTP 500.
    pub fn fail_source(&self, source: &'static str) {
        self.state().failing.insert(source);
    }

    fn authorize(&self, token: &AccessToken, source: &'static str) -> Result<User, GatewayError> {
        let state = self.state();
        let user = state
            .tokens
            .get(token.expose())
            .cloned()
            .ok_or_else(|| GatewayError::unauthorized("Unauthenticated."))?;
        if state.failing.contains(source) {
            return Err(GatewayError::status(500_u16, format!("{source} unavailable")));
        }
        Ok(user)
    }
}

#[async_trait]
impl AuthGateway for FakeBackend {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginGrant, GatewayError> {
        let matches = self
            .state()
            .accounts
            .get(credentials.email())
            .is_some_and(|(password, _)| password == credentials.password());
        if !matches {
            return Err(GatewayError::unauthorized("Invalid credentials"));
        }
        let token = self.issue_token(credentials.email());
        let user = self.state().tokens[&token].clone();
        Ok(LoginGrant {
            token: AccessToken::parse(&token).map_err(|e| GatewayError::decode(e.to_string()))?,
            user,
        })
    }

    async fn current_user(&self, token: &AccessToken) -> Result<User, GatewayError> {
        self.authorize(token, "user")
    }

    async fn register(&self, form: &RegistrationForm) -> Result<RegistrationAck, GatewayError> {
        let user = barangay_user(form.email.trim(), ApprovalStatus::Pending);
        self.add_account(&form.password, user);
        Ok(RegistrationAck {
            message: "Registration submitted. Please wait for approval.".to_owned(),
        })
    }
}

#[async_trait]
impl DashboardSource for FakeBackend {
    async fn incident_stats(&self, token: &AccessToken) -> Result<IncidentStats, GatewayError> {
        self.authorize(token, "incidents")?;
        Ok(IncidentStats {
            total: 8,
            pending: 2,
            in_progress: 3,
            resolved: 3,
            critical: 1,
        })
    }

    async fn recent_incidents(
        &self,
        token: &AccessToken,
        limit: usize,
    ) -> Result<Vec<Incident>, GatewayError> {
        self.authorize(token, "recentIncidents")?;
        Ok((1..=8)
            .map(|id| Incident {
                id,
                title: format!("Incident {id}"),
                ..Incident::default()
            })
            .take(limit)
            .collect())
    }

    async fn notifications(
        &self,
        token: &AccessToken,
        limit: usize,
    ) -> Result<Vec<Notification>, GatewayError> {
        self.authorize(token, "recentNotifications")?;
        Ok((1..=3)
            .map(|id| Notification {
                id,
                title: format!("Advisory {id}"),
                ..Notification::default()
            })
            .take(limit)
            .collect())
    }

    async fn unread_count(&self, token: &AccessToken) -> Result<UnreadCount, GatewayError> {
        self.authorize(token, "unreadCount")?;
        Ok(UnreadCount(3))
    }

    async fn population_overview(
        &self,
        token: &AccessToken,
    ) -> Result<PopulationOverview, GatewayError> {
        self.authorize(token, "population")?;
        Ok(PopulationOverview {
            total_population: 5120,
            total_households: 1210,
            ..PopulationOverview::default()
        })
    }

    async fn barangay_analytics(
        &self,
        token: &AccessToken,
    ) -> Result<AnalyticsSummary, GatewayError> {
        self.authorize(token, "analytics")?;
        Ok(AnalyticsSummary::default())
    }

    async fn pending_users_count(
        &self,
        token: &AccessToken,
    ) -> Result<PendingUsersCount, GatewayError> {
        self.authorize(token, "pendingUsers")?;
        Ok(PendingUsersCount(2))
    }

    async fn barangay_population(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<BarangayPopulation>, GatewayError> {
        self.authorize(token, "barangayPopulation")?;
        Ok(Vec::new())
    }

    async fn municipal_analytics(
        &self,
        token: &AccessToken,
    ) -> Result<AnalyticsSummary, GatewayError> {
        self.authorize(token, "analytics")?;
        Ok(AnalyticsSummary::default())
    }
}

#[async_trait]
impl NotificationCommand for FakeBackend {
    async fn mark_read(&self, token: &AccessToken, _notification_id: u64) -> Result<(), GatewayError> {
        self.authorize(token, "markRead").map(drop)
    }
}
