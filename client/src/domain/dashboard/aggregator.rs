//! Concurrent fan-out of the dashboard source lists.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use super::{AdminDashboard, BarangayDashboard, DashboardSnapshot, SourceFailure, SourceName, settle};
use crate::domain::AccessToken;
use crate::domain::ports::DashboardSource;

const DEFAULT_RECENT_LIMIT: usize = 5;

/// List sizes requested for the "recent" dashboard slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardLimits {
    /// Notifications shown on the dashboard.
    pub notifications: usize,
    /// Incidents shown on the dashboard.
    pub incidents: usize,
}

impl Default for DashboardLimits {
    fn default() -> Self {
        Self {
            notifications: DEFAULT_RECENT_LIMIT,
            incidents: DEFAULT_RECENT_LIMIT,
        }
    }
}

/// Builds dashboard snapshots from a [`DashboardSource`].
///
/// Every load issues all of the variant's requests at once and waits for
/// each to settle. A refresh is simply another load.
pub struct DashboardAggregator<S: ?Sized> {
    source: Arc<S>,
    limits: DashboardLimits,
}

impl<S: ?Sized> Clone for DashboardAggregator<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            limits: self.limits,
        }
    }
}

impl<S: ?Sized> DashboardAggregator<S> {
    /// Create an aggregator with the default list limits.
    pub fn new(source: Arc<S>) -> Self {
        Self::with_limits(source, DashboardLimits::default())
    }

    /// Create an aggregator with explicit list limits.
    pub fn with_limits(source: Arc<S>, limits: DashboardLimits) -> Self {
        Self { source, limits }
    }

    /// Backing source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Configured list limits.
    pub fn limits(&self) -> DashboardLimits {
        self.limits
    }
}

impl<S> DashboardAggregator<S>
where
    S: DashboardSource + ?Sized,
{
    /// Load the five barangay sources concurrently.
    pub async fn barangay(&self, token: &AccessToken) -> DashboardSnapshot<BarangayDashboard> {
        let source = self.source.as_ref();
        let (incidents, population, notifications, recent_incidents, analytics) = tokio::join!(
            settle(SourceName::Incidents, source.incident_stats(token)),
            settle(SourceName::Population, source.population_overview(token)),
            settle(
                SourceName::RecentNotifications,
                source.notifications(token, self.limits.notifications),
            ),
            settle(
                SourceName::RecentIncidents,
                source.recent_incidents(token, self.limits.incidents),
            ),
            settle(SourceName::Analytics, source.barangay_analytics(token)),
        );

        let mut failures = BTreeMap::new();
        let data = BarangayDashboard {
            incidents: incidents.record(&mut failures),
            population: population.record(&mut failures),
            recent_notifications: notifications.record(&mut failures),
            recent_incidents: recent_incidents.record(&mut failures),
            analytics: analytics.record(&mut failures),
        };
        finish("barangay", data, failures)
    }

    /// Load the six admin sources concurrently.
    pub async fn admin(&self, token: &AccessToken) -> DashboardSnapshot<AdminDashboard> {
        let source = self.source.as_ref();
        let (incidents, pending_users, barangay_population, analytics, notifications, recent) = tokio::join!(
            settle(SourceName::Incidents, source.incident_stats(token)),
            settle(SourceName::PendingUsers, source.pending_users_count(token)),
            settle(
                SourceName::BarangayPopulation,
                source.barangay_population(token),
            ),
            settle(SourceName::Analytics, source.municipal_analytics(token)),
            settle(
                SourceName::RecentNotifications,
                source.notifications(token, self.limits.notifications),
            ),
            settle(
                SourceName::RecentIncidents,
                source.recent_incidents(token, self.limits.incidents),
            ),
        );

        let mut failures = BTreeMap::new();
        let data = AdminDashboard {
            incidents: incidents.record(&mut failures),
            pending_users: pending_users.record(&mut failures),
            barangay_population: barangay_population.record(&mut failures),
            analytics: analytics.record(&mut failures),
            recent_notifications: notifications.record(&mut failures),
            recent_incidents: recent.record(&mut failures),
        };
        finish("admin", data, failures)
    }
}

fn finish<T>(
    variant: &'static str,
    data: T,
    failures: BTreeMap<SourceName, SourceFailure>,
) -> DashboardSnapshot<T> {
    let snapshot = DashboardSnapshot::new(data, failures);
    info!(
        variant,
        partial_failure = snapshot.partial_failure(),
        failed = snapshot.failed_sources().count(),
        "dashboard aggregated"
    );
    snapshot
}
