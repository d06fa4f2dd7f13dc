//! Domain primitives, session lifecycle, and dashboard aggregation.
//!
//! Purpose: hold everything that decides *who* is signed in and *what* they
//! may see, independent of HTTP or filesystem details. Adapters live in
//! `crate::outbound`; this module only talks to them through `ports`.
//!
//! Public surface:
//! - Error / ErrorCode / FieldErrors: user-facing failure payload.
//! - User / Role / ApprovalStatus: authorization facts from the backend.
//! - LoginCredentials / AccessToken / LoginGrant: sign-in inputs and outputs.
//! - RegistrationForm / RegistrationReceipt: account sign-up.
//! - Session / SessionPhase / SessionManager: the observable session.
//! - CapabilityRequirement / Decision / decide: route access policy.
//! - dashboard: role-specific, partially failing dashboards.

pub mod auth;
pub mod capability;
pub mod dashboard;
pub mod error;
pub mod ports;
pub mod registration;
pub mod session;
pub mod session_manager;
pub mod user;

pub use self::auth::{AccessToken, LoginCredentials, LoginGrant, LoginValidationError};
pub use self::capability::{
    CapabilityRequirement, DASHBOARD_PATH, Decision, LOGIN_PATH, decide,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, FieldErrors};
pub use self::registration::{RegistrationAck, RegistrationForm, RegistrationReceipt};
pub use self::session::{Session, SessionPhase};
pub use self::session_manager::SessionManager;
pub use self::user::{ApprovalStatus, Role, User, UserBuilder, UserId, UserValidationError};
