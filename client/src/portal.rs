//! Composition root shared by the binary and integration tests.

use std::sync::Arc;

use thiserror::Error;

use crate::config::{PortalSettings, SettingsError};
use crate::domain::dashboard::{DashboardAggregator, DashboardService};
use crate::domain::ports::{
    AuthGateway, DashboardSource, NotificationCommand, TokenStore, TokenStoreError,
};
use crate::domain::SessionManager;
use crate::inbound::routing::{Navigator, RouteTable};
use crate::outbound::http::PortalHttpGateway;
use crate::outbound::token_file::FileTokenStore;

/// Failures while wiring the client from settings.
#[derive(Debug, Error)]
pub enum PortalBuildError {
    /// A setting is invalid.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    /// The token store could not be opened.
    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),
}

/// Session manager, dashboard service, and route table wired together.
pub struct Portal {
    sessions: Arc<SessionManager>,
    dashboard: DashboardService,
    routes: RouteTable,
}

impl Portal {
    /// Wire the client from explicit port implementations.
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        source: Arc<dyn DashboardSource>,
        notifications: Arc<dyn NotificationCommand>,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        let sessions = Arc::new(SessionManager::new(auth, store));
        let dashboard = DashboardService::new(
            Arc::clone(&sessions),
            DashboardAggregator::new(source),
            notifications,
        );
        Self {
            sessions,
            dashboard,
            routes: RouteTable::portal(),
        }
    }

    /// Wire the HTTP gateway and file token store described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalBuildError`] for invalid settings, an HTTP client that
    /// cannot be built, or a state directory that cannot be opened.
    pub fn from_settings(settings: &PortalSettings) -> Result<Self, PortalBuildError> {
        let gateway = Arc::new(PortalHttpGateway::new(
            settings.api_base_url()?,
            settings.request_timeout()?,
        )?);
        let store = Arc::new(FileTokenStore::open(
            &settings.state_dir(),
            &settings.token_file(),
        )?);
        Ok(Self::new(gateway.clone(), gateway.clone(), gateway, store))
    }

    /// The session manager.
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// The dashboard service.
    pub fn dashboard(&self) -> &DashboardService {
        &self.dashboard
    }

    /// A navigator mounted at `path`, following the live session.
    pub fn navigator(&self, path: &str) -> Navigator {
        Navigator::new(self.routes.clone(), self.sessions.subscribe(), path)
    }
}
