//! Driven port for authentication and account endpoints.
//!
//! The session manager is the only caller. Adapters own transport details;
//! the port speaks in validated domain types.

use async_trait::async_trait;

use super::GatewayError;
use crate::domain::{
    AccessToken, LoginCredentials, LoginGrant, RegistrationAck, RegistrationForm, User,
};

/// Port for the backend's authentication endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a token and the user's authorization facts
    /// (`POST /login`).
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginGrant, GatewayError>;

    /// Resolve the user a persisted token belongs to (`GET /user`).
    async fn current_user(&self, token: &AccessToken) -> Result<User, GatewayError>;

    /// Submit a registration form (`POST /register`).
    async fn register(&self, form: &RegistrationForm) -> Result<RegistrationAck, GatewayError>;
}
