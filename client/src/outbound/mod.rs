//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **http**: reqwest-backed client for the portal backend API
//!   (`AuthGateway`, `DashboardSource`, `NotificationCommand`).
//! - **token_file**: capability-scoped file holding the bearer token
//!   (`TokenStore`).
//!
//! Adapters are thin translators between domain types and wire formats. They
//! contain no session or dashboard logic.

pub mod http;
pub mod token_file;
