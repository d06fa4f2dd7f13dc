//! Inbound adapters that translate navigation requests into domain
//! decisions while keeping presentation details at the edge.
//!
//! Route resolution and guarding live under [`routing`].

pub mod routing;
