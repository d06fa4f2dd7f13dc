//! Client core for the barangay incident and population portal.
//!
//! The crate owns the authenticated session, decides which routes a user may
//! see, and assembles role-specific dashboards from backend sources that fail
//! independently.
//!
//! - [`domain`]: session lifecycle, capability policy, dashboard aggregation.
//! - [`inbound`]: route table, route guards, and the navigator.
//! - [`outbound`]: reqwest backend adapter and file token store.
//! - [`config`]: OrthoConfig-backed settings.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
mod portal;

pub use portal::{Portal, PortalBuildError};
