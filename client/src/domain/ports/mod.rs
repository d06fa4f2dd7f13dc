//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_gateway;
mod dashboard_source;
mod gateway_error;
mod token_store;

#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use auth_gateway::AuthGateway;
#[cfg(test)]
pub use dashboard_source::{MockDashboardSource, MockNotificationCommand};
pub use dashboard_source::{DashboardSource, NotificationCommand};
pub use gateway_error::GatewayError;
#[cfg(test)]
pub use token_store::MockTokenStore;
pub use token_store::{InMemoryTokenStore, TokenStore, TokenStoreError};
