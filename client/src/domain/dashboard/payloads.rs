//! Typed dashboard payloads.
//!
//! Every payload implements `Default`, and that default is the documented
//! fallback a dashboard slot receives when its source fails: zero counts for
//! objects, empty vectors for lists.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Incident counters from `GET /incidents/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncidentStats {
    /// All incidents visible to the caller.
    #[serde(alias = "total_incidents")]
    pub total: u64,
    /// Reported but not yet acted on.
    #[serde(alias = "pending_incidents")]
    pub pending: u64,
    /// Responders assigned.
    #[serde(alias = "in_progress")]
    pub in_progress: u64,
    /// Closed incidents.
    #[serde(alias = "resolved_incidents")]
    pub resolved: u64,
    /// Incidents flagged critical.
    #[serde(alias = "critical_incidents")]
    pub critical: u64,
}

/// One incident as listed on dashboards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Backend identifier.
    pub id: u64,
    /// Short headline.
    #[serde(default)]
    pub title: String,
    /// Category such as `flood` or `fire`.
    #[serde(default, alias = "incident_type")]
    pub incident_type: String,
    /// Workflow status as reported by the backend.
    #[serde(default)]
    pub status: String,
    /// Severity label, when assigned.
    #[serde(default)]
    pub severity: Option<String>,
    /// Free-text location.
    #[serde(default)]
    pub location: Option<String>,
    /// Creation timestamp as sent by the backend.
    #[serde(default, alias = "created_at")]
    pub created_at: Option<String>,
}

/// One in-app notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Backend identifier, used to mark the notification as read.
    pub id: u64,
    /// Headline.
    #[serde(default)]
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub message: String,
    /// Notification category (`type` on the wire).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Whether the user has already read it.
    #[serde(default, alias = "is_read")]
    pub is_read: bool,
    /// Creation timestamp as sent by the backend.
    #[serde(default, alias = "created_at")]
    pub created_at: Option<String>,
}

/// Demographic counters shared by barangay and municipal population views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PopulationCounts {
    /// Residents.
    #[serde(alias = "total_population")]
    pub total_population: u64,
    /// Households.
    #[serde(alias = "total_households")]
    pub total_households: u64,
    /// Male residents.
    pub male: u64,
    /// Female residents.
    pub female: u64,
    /// Residents aged 60 and above.
    #[serde(alias = "senior_citizens")]
    pub senior_citizens: u64,
    /// Persons with disability.
    pub pwd: u64,
    /// Residents below 18.
    pub children: u64,
}

/// Population overview for the signed-in barangay.
pub type PopulationOverview = PopulationCounts;

/// Population row for one barangay in the municipal view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarangayPopulation {
    /// Barangay name.
    #[serde(alias = "barangay_name", alias = "barangay")]
    pub barangay_name: String,
    /// Counters for the barangay.
    #[serde(flatten)]
    pub counts: PopulationCounts,
}

/// Incident analytics for a barangay or the whole municipality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Incidents reported in the current month.
    #[serde(alias = "incidents_this_month")]
    pub incidents_this_month: u64,
    /// Incidents reported in the previous month.
    #[serde(alias = "incidents_last_month")]
    pub incidents_last_month: u64,
    /// Share of incidents resolved, in percent.
    #[serde(alias = "resolution_rate")]
    pub resolution_rate: f64,
    /// Mean time to response, in hours.
    #[serde(alias = "average_response_hours")]
    pub average_response_hours: f64,
    /// Incident counts per category.
    #[serde(alias = "by_type")]
    pub by_type: BTreeMap<String, u64>,
}

/// Accounts awaiting administrator approval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingUsersCount(pub u64);

/// Unread notification badge count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnreadCount(pub u64);
