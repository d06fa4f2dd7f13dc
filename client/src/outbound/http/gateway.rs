//! Reqwest-backed portal backend adapter.
//!
//! This adapter owns transport details only: URL construction, bearer
//! headers, multipart encoding, timeout and HTTP error mapping, and JSON
//! decoding into domain payloads.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::dto::{
    ErrorBodyDto, ListEnvelopeDto, LoginRequestDto, LoginResponseDto, ObjectEnvelopeDto,
    PayloadKeys, PendingUsersCountDto, RegistrationResponseDto, UnreadCountDto,
    UserEnvelopeDto,
};
use crate::domain::dashboard::{
    AnalyticsSummary, BarangayPopulation, Incident, IncidentStats, Notification,
    PendingUsersCount, PopulationOverview, UnreadCount,
};
use crate::domain::ports::{AuthGateway, DashboardSource, GatewayError, NotificationCommand};
use crate::domain::{
    AccessToken, FieldErrors, LoginCredentials, LoginGrant, RegistrationAck, RegistrationForm,
    User,
};

const DEFAULT_REGISTRATION_MESSAGE: &str =
    "Registration submitted. Your account is awaiting approval.";

/// Portal backend adapter performing HTTP requests against one base URL.
#[derive(Debug, Clone)]
pub struct PortalHttpGateway {
    client: Client,
    base_url: Url,
}

impl PortalHttpGateway {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    /// ```rust,ignore
    /// let gateway = PortalHttpGateway::new(base_url, Duration::from_secs(15));
    /// assert!(gateway.is_ok() || gateway.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Build an adapter around an existing client.
    pub fn with_client(client: Client, mut base_url: Url) -> Self {
        // `Url::join` replaces the last segment unless the base ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|error| GatewayError::transport(format!("invalid endpoint {path}: {error}")))
    }

    fn get(&self, path: &str, token: &AccessToken) -> Result<RequestBuilder, GatewayError> {
        Ok(self.client.get(self.endpoint(path)?).bearer_auth(token.expose()))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>, GatewayError> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "backend responded");
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let body = self.execute(request).await?;
        decode(&body)
    }

    async fn fetch_object<T: DeserializeOwned + PayloadKeys>(
        &self,
        path: &str,
        token: &AccessToken,
    ) -> Result<T, GatewayError> {
        let envelope: ObjectEnvelopeDto<T> = self.fetch(self.get(path, token)?).await?;
        Ok(envelope.into_inner())
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &AccessToken,
        limit: Option<usize>,
    ) -> Result<Vec<T>, GatewayError> {
        let mut request = self.get(path, token)?;
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        let envelope: ListEnvelopeDto<T> = self.fetch(request).await?;
        let mut items = envelope.into_items();
        if let Some(limit) = limit {
            items.truncate(limit);
        }
        Ok(items)
    }
}

#[async_trait]
impl AuthGateway for PortalHttpGateway {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginGrant, GatewayError> {
        let request = self
            .client
            .post(self.endpoint("login")?)
            .json(&LoginRequestDto {
                email: credentials.email(),
                password: credentials.password(),
            });
        let decoded: LoginResponseDto = self.fetch(request).await?;
        let token = AccessToken::parse(&decoded.access_token)
            .map_err(|error| GatewayError::decode(format!("login token: {error}")))?;
        Ok(LoginGrant {
            token,
            user: decoded.user,
        })
    }

    async fn current_user(&self, token: &AccessToken) -> Result<User, GatewayError> {
        let decoded: UserEnvelopeDto = self.fetch(self.get("user", token)?).await?;
        Ok(decoded.into_user())
    }

    async fn register(&self, form: &RegistrationForm) -> Result<RegistrationAck, GatewayError> {
        let multipart = form
            .text_fields()
            .into_iter()
            .fold(Form::new(), |multipart, (name, value)| {
                multipart.text(name, value)
            });
        let request = self
            .client
            .post(self.endpoint("register")?)
            .multipart(multipart);
        let body = self.execute(request).await?;
        // Some deployments answer 201 with an empty body.
        let decoded = if body.iter().all(u8::is_ascii_whitespace) {
            RegistrationResponseDto::default()
        } else {
            decode::<RegistrationResponseDto>(&body)?
        };
        Ok(RegistrationAck {
            message: decoded
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_REGISTRATION_MESSAGE.to_owned()),
        })
    }
}

#[async_trait]
impl DashboardSource for PortalHttpGateway {
    async fn incident_stats(&self, token: &AccessToken) -> Result<IncidentStats, GatewayError> {
        self.fetch_object("incidents/stats", token).await
    }

    async fn recent_incidents(
        &self,
        token: &AccessToken,
        limit: usize,
    ) -> Result<Vec<Incident>, GatewayError> {
        self.fetch_list("incidents", token, Some(limit)).await
    }

    async fn notifications(
        &self,
        token: &AccessToken,
        limit: usize,
    ) -> Result<Vec<Notification>, GatewayError> {
        self.fetch_list("notifications", token, Some(limit)).await
    }

    async fn unread_count(&self, token: &AccessToken) -> Result<UnreadCount, GatewayError> {
        let decoded: UnreadCountDto = self
            .fetch(self.get("notifications/unread-count", token)?)
            .await?;
        Ok(UnreadCount(decoded.unread_count))
    }

    async fn population_overview(
        &self,
        token: &AccessToken,
    ) -> Result<PopulationOverview, GatewayError> {
        self.fetch_object("population/barangay-overview", token)
            .await
    }

    async fn barangay_analytics(
        &self,
        token: &AccessToken,
    ) -> Result<AnalyticsSummary, GatewayError> {
        self.fetch_object("analytics/barangay", token).await
    }

    async fn pending_users_count(
        &self,
        token: &AccessToken,
    ) -> Result<PendingUsersCount, GatewayError> {
        let decoded: PendingUsersCountDto = self
            .fetch(self.get("admin/pending-users-count", token)?)
            .await?;
        Ok(PendingUsersCount(decoded.count))
    }

    async fn barangay_population(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<BarangayPopulation>, GatewayError> {
        self.fetch_list("admin/barangays/population-data", token, None)
            .await
    }

    async fn municipal_analytics(
        &self,
        token: &AccessToken,
    ) -> Result<AnalyticsSummary, GatewayError> {
        self.fetch_object("analytics/municipal", token).await
    }
}

#[async_trait]
impl NotificationCommand for PortalHttpGateway {
    async fn mark_read(
        &self,
        token: &AccessToken,
        notification_id: u64,
    ) -> Result<(), GatewayError> {
        let path = format!("notifications/{notification_id}/read");
        let request = self
            .client
            .post(self.endpoint(&path)?)
            .bearer_auth(token.expose());
        self.execute(request).await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, GatewayError> {
    serde_json::from_slice(body).map_err(|error| {
        GatewayError::decode(format!(
            "invalid backend JSON payload: {error}; body: {}",
            body_preview(body)
        ))
    })
}

fn map_transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::timeout(error.to_string())
    } else {
        GatewayError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GatewayError {
    let parsed: ErrorBodyDto = serde_json::from_slice(body).unwrap_or_default();
    let message = parsed
        .message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_default();

    match status {
        StatusCode::UNAUTHORIZED => GatewayError::unauthorized(message),
        StatusCode::FORBIDDEN => GatewayError::forbidden(message),
        StatusCode::UNPROCESSABLE_ENTITY if !parsed.errors.is_empty() => {
            let mut fields = FieldErrors::new();
            for (field, messages) in parsed.errors {
                for text in messages.into_messages() {
                    fields.push(field.as_str(), text);
                }
            }
            GatewayError::validation(message, fields)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            GatewayError::timeout(format!("status {}", status.as_u16()))
        }
        _ => {
            let detail = if message.is_empty() {
                body_preview(body)
            } else {
                message
            };
            GatewayError::status(status.as_u16(), detail)
        }
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
