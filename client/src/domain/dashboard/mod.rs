//! Role-specific dashboards assembled from independently failing sources.
//!
//! Purpose: turn N backend calls into one [`DashboardSnapshot`] that is
//! always renderable. A failed source contributes its documented default and
//! marks the snapshot as a partial failure; it never blanks the view.
//!
//! Public surface:
//! - [`settle`] / [`settle_all`]: the settle-all-with-default combinator.
//! - [`DashboardAggregator`]: fans out the source list for each variant.
//! - [`DashboardService`]: session-aware entry point (variant selection,
//!   forced expiry, notification commands).

mod aggregator;
mod payloads;
mod service;
mod settle;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::domain::ports::GatewayError;

pub use aggregator::{DashboardAggregator, DashboardLimits};
pub use payloads::{
    AnalyticsSummary, BarangayPopulation, Incident, IncidentStats, Notification,
    PendingUsersCount, PopulationCounts, PopulationOverview, UnreadCount,
};
pub use service::{DashboardService, UnreadBadge};
pub use settle::{Settled, settle, settle_all};

/// Name of one dashboard data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceName {
    /// Incident counters.
    Incidents,
    /// Barangay population overview.
    Population,
    /// Latest notifications.
    RecentNotifications,
    /// Latest incidents.
    RecentIncidents,
    /// Barangay or municipal analytics.
    Analytics,
    /// Accounts awaiting approval.
    PendingUsers,
    /// Per-barangay population rows.
    BarangayPopulation,
    /// Unread notification count.
    UnreadCount,
}

impl SourceName {
    /// Stable camelCase name used in logs and serialized snapshots.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incidents => "incidents",
            Self::Population => "population",
            Self::RecentNotifications => "recentNotifications",
            Self::RecentIncidents => "recentIncidents",
            Self::Analytics => "analytics",
            Self::PendingUsers => "pendingUsers",
            Self::BarangayPopulation => "barangayPopulation",
            Self::UnreadCount => "unreadCount",
        }
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a source fell back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFailure {
    /// Failure class such as `timeout`, `status`, or `decode`.
    pub kind: &'static str,
    /// Diagnostic reason, for logs. Not shown to users individually.
    pub reason: String,
    /// The backend rejected the bearer token.
    pub auth_expired: bool,
}

impl From<GatewayError> for SourceFailure {
    fn from(value: GatewayError) -> Self {
        Self {
            kind: value.kind(),
            auth_expired: value.is_auth_failure(),
            reason: value.to_string(),
        }
    }
}

/// One aggregation result: the variant payload plus per-source failures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot<T> {
    #[serde(flatten)]
    data: T,
    partial_failure: bool,
    failed_sources: BTreeMap<SourceName, SourceFailure>,
}

impl<T> DashboardSnapshot<T> {
    /// Assemble a snapshot from settled slots.
    pub fn new(data: T, failed_sources: BTreeMap<SourceName, SourceFailure>) -> Self {
        Self {
            data,
            partial_failure: !failed_sources.is_empty(),
            failed_sources,
        }
    }

    /// Slot payloads.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consume the snapshot, returning the payloads.
    pub fn into_data(self) -> T {
        self.data
    }

    /// True if at least one source fell back to its default.
    pub fn partial_failure(&self) -> bool {
        self.partial_failure
    }

    /// Sources that fell back to their default.
    pub fn failed_sources(&self) -> impl Iterator<Item = SourceName> + '_ {
        self.failed_sources.keys().copied()
    }

    /// Failure details for `source`, if it failed.
    pub fn failure(&self, source: SourceName) -> Option<&SourceFailure> {
        self.failed_sources.get(&source)
    }

    /// Whether any source reported an expired or invalid token.
    pub fn auth_expired(&self) -> bool {
        self.failed_sources
            .values()
            .any(|failure| failure.auth_expired)
    }
}

/// Dashboard for an approved barangay account (five sources).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarangayDashboard {
    /// Incident counters for the barangay.
    pub incidents: IncidentStats,
    /// Population overview.
    pub population: PopulationOverview,
    /// Latest notifications.
    pub recent_notifications: Vec<Notification>,
    /// Latest incidents.
    pub recent_incidents: Vec<Incident>,
    /// Barangay analytics.
    pub analytics: AnalyticsSummary,
}

/// Dashboard for a municipal administrator (six sources).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    /// Municipal incident counters.
    pub incidents: IncidentStats,
    /// Accounts awaiting approval.
    pub pending_users: PendingUsersCount,
    /// Population rows per barangay.
    pub barangay_population: Vec<BarangayPopulation>,
    /// Municipal analytics.
    pub analytics: AnalyticsSummary,
    /// Latest notifications.
    pub recent_notifications: Vec<Notification>,
    /// Latest incidents.
    pub recent_incidents: Vec<Incident>,
}

/// Dashboard selected by the signed-in user's role.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant", rename_all = "camelCase")]
pub enum DashboardView {
    /// Barangay variant.
    Barangay(DashboardSnapshot<BarangayDashboard>),
    /// Admin variant.
    Admin(DashboardSnapshot<AdminDashboard>),
}

impl DashboardView {
    /// True if at least one source fell back to its default.
    pub fn partial_failure(&self) -> bool {
        match self {
            Self::Barangay(snapshot) => snapshot.partial_failure(),
            Self::Admin(snapshot) => snapshot.partial_failure(),
        }
    }

    /// Whether any source reported an expired or invalid token.
    pub fn auth_expired(&self) -> bool {
        match self {
            Self::Barangay(snapshot) => snapshot.auth_expired(),
            Self::Admin(snapshot) => snapshot.auth_expired(),
        }
    }

    /// Remove a notification from the local view after it was marked read.
    pub fn remove_notification(&mut self, notification_id: u64) {
        let notifications = match self {
            Self::Barangay(snapshot) => &mut snapshot.data.recent_notifications,
            Self::Admin(snapshot) => &mut snapshot.data.recent_notifications,
        };
        notifications.retain(|notification| notification.id != notification_id);
    }
}
