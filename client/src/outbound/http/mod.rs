//! Portal backend HTTP adapter.
//!
//! A single reqwest client implements `AuthGateway`, `DashboardSource`, and
//! `NotificationCommand` against the configured base URL.

mod dto;
mod gateway;

pub use gateway::PortalHttpGateway;
