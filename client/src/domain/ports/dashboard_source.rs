//! Driven ports for dashboard data and notification commands.
//!
//! Each method maps to one independently fallible backend call. The
//! dashboard aggregator fans these out concurrently and substitutes
//! defaults for failures, so adapters report every problem as an error
//! rather than inventing fallback data themselves.

use async_trait::async_trait;

use super::GatewayError;
use crate::domain::AccessToken;
use crate::domain::dashboard::{
    AnalyticsSummary, BarangayPopulation, Incident, IncidentStats, Notification,
    PendingUsersCount, PopulationOverview, UnreadCount,
};

/// Read-side port for the dashboard sources.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// `GET /incidents/stats`.
    async fn incident_stats(&self, token: &AccessToken) -> Result<IncidentStats, GatewayError>;

    /// `GET /incidents?limit=N`.
    async fn recent_incidents(
        &self,
        token: &AccessToken,
        limit: usize,
    ) -> Result<Vec<Incident>, GatewayError>;

    /// `GET /notifications?limit=N`.
    async fn notifications(
        &self,
        token: &AccessToken,
        limit: usize,
    ) -> Result<Vec<Notification>, GatewayError>;

    /// `GET /notifications/unread-count`.
    async fn unread_count(&self, token: &AccessToken) -> Result<UnreadCount, GatewayError>;

    /// `GET /population/barangay-overview`.
    async fn population_overview(
        &self,
        token: &AccessToken,
    ) -> Result<PopulationOverview, GatewayError>;

    /// `GET /analytics/barangay`.
    async fn barangay_analytics(
        &self,
        token: &AccessToken,
    ) -> Result<AnalyticsSummary, GatewayError>;

    /// `GET /admin/pending-users-count`.
    async fn pending_users_count(
        &self,
        token: &AccessToken,
    ) -> Result<PendingUsersCount, GatewayError>;

    /// `GET /admin/barangays/population-data`.
    async fn barangay_population(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<BarangayPopulation>, GatewayError>;

    /// `GET /analytics/municipal`.
    async fn municipal_analytics(
        &self,
        token: &AccessToken,
    ) -> Result<AnalyticsSummary, GatewayError>;
}

/// Write-side port for notification state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationCommand: Send + Sync {
    /// `POST /notifications/{id}/read`.
    async fn mark_read(&self, token: &AccessToken, notification_id: u64)
        -> Result<(), GatewayError>;
}
