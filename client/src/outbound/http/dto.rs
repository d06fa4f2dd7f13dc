//! DTOs for decoding portal backend responses.
//!
//! The backend is not consistent about envelopes: the same resource may come
//! back bare, under `data`, or under a resource-named key. The adapter
//! decodes into these transport DTOs first, then unwraps into domain payloads
//! in one pass.

use std::collections::BTreeMap;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::User;
use crate::domain::dashboard::{AnalyticsSummary, IncidentStats, PopulationCounts};

#[derive(Debug, Serialize)]
pub(super) struct LoginRequestDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginResponseDto {
    #[serde(alias = "token", alias = "accessToken")]
    pub(super) access_token: String,
    pub(super) user: User,
}

/// `GET /user` answers with `{user}` or with the bare user object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum UserEnvelopeDto {
    Wrapped { user: User },
    Bare(User),
}

impl UserEnvelopeDto {
    pub(super) fn into_user(self) -> User {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => user,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RegistrationResponseDto {
    #[serde(default)]
    pub(super) message: Option<String>,
}

/// Wire keys that identify a bare payload object.
///
/// Payloads default every field, so without this check any JSON object,
/// error bodies included, would decode as an all-zero payload.
pub(super) trait PayloadKeys {
    const KEYS: &'static [&'static str];
}

impl PayloadKeys for IncidentStats {
    const KEYS: &'static [&'static str] = &[
        "total",
        "total_incidents",
        "pending",
        "pending_incidents",
        "inProgress",
        "in_progress",
        "resolved",
        "resolved_incidents",
        "critical",
        "critical_incidents",
    ];
}

impl PayloadKeys for PopulationCounts {
    const KEYS: &'static [&'static str] = &[
        "totalPopulation",
        "total_population",
        "totalHouseholds",
        "total_households",
        "male",
        "female",
        "seniorCitizens",
        "senior_citizens",
        "pwd",
        "children",
    ];
}

impl PayloadKeys for AnalyticsSummary {
    const KEYS: &'static [&'static str] = &[
        "incidentsThisMonth",
        "incidents_this_month",
        "incidentsLastMonth",
        "incidents_last_month",
        "resolutionRate",
        "resolution_rate",
        "averageResponseHours",
        "average_response_hours",
        "byType",
        "by_type",
    ];
}

/// Single resource, under `data` or bare.
///
/// A `data` key is decoded strictly with no bare fallback. A bare object
/// must carry at least one of the payload's [`PayloadKeys`].
#[derive(Debug)]
pub(super) struct ObjectEnvelopeDto<T>(T);

impl<T> ObjectEnvelopeDto<T> {
    pub(super) fn into_inner(self) -> T {
        self.0
    }
}

impl<'de, T> Deserialize<'de> for ObjectEnvelopeDto<T>
where
    T: DeserializeOwned + PayloadKeys,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut body = Map::<String, Value>::deserialize(deserializer)?;
        if let Some(data) = body.remove("data") {
            return T::deserialize(data).map(Self).map_err(D::Error::custom);
        }
        if !T::KEYS.iter().any(|key| body.contains_key(*key)) {
            return Err(D::Error::custom(
                "object carries none of the expected payload fields",
            ));
        }
        T::deserialize(Value::Object(body))
            .map(Self)
            .map_err(D::Error::custom)
    }
}

/// Collection, bare or under `data`, `notifications`, or `incidents`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum ListEnvelopeDto<T> {
    Bare(Vec<T>),
    Data { data: Vec<T> },
    Notifications { notifications: Vec<T> },
    Incidents { incidents: Vec<T> },
}

impl<T> ListEnvelopeDto<T> {
    pub(super) fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items)
            | Self::Data { data: items }
            | Self::Notifications {
                notifications: items,
            }
            | Self::Incidents { incidents: items } => items,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UnreadCountDto {
    #[serde(alias = "unreadCount", alias = "count")]
    pub(super) unread_count: u64,
}

#[derive(Debug, Deserialize)]
pub(super) struct PendingUsersCountDto {
    #[serde(alias = "pending_users_count", alias = "pendingUsersCount")]
    pub(super) count: u64,
}

/// Error body: `{message}` and, for validation failures, `{errors}`.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default, alias = "error")]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) errors: BTreeMap<String, FieldMessagesDto>,
}

/// Field errors arrive as a list, occasionally as a single string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum FieldMessagesDto {
    Many(Vec<String>),
    One(String),
}

impl FieldMessagesDto {
    pub(super) fn into_messages(self) -> Vec<String> {
        match self {
            Self::Many(messages) => messages,
            Self::One(message) => vec![message],
        }
    }
}
