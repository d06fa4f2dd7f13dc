//! Shared helpers for portal client integration tests.
//!
//! Integration tests compile as separate crates, so each suite pulls this
//! module in with `mod support;` and uses only what it needs.

pub mod fake_backend;
