//! Error contract shared by every backend gateway port.

use super::define_port_error;
use crate::domain::{Error, FieldErrors};

const DEFAULT_UNAUTHORIZED: &str = "Invalid email or password.";
const DEFAULT_FORBIDDEN: &str = "Your account is not allowed to do that.";
const DEFAULT_VALIDATION: &str = "Please correct the highlighted fields.";
const UNREACHABLE: &str = "Unable to reach the server. Check your connection and try again.";
const UNEXPECTED_RESPONSE: &str = "The server sent an unexpected response.";

define_port_error! {
    /// Errors surfaced while calling the portal backend.
    pub enum GatewayError {
        /// The backend rejected the credentials or bearer token (HTTP 401).
        Unauthorized { message: String } =>
            "backend rejected credentials: {message}",
        /// The caller is authenticated but not permitted (HTTP 403).
        Forbidden { message: String } =>
            "backend refused the request: {message}",
        /// The backend rejected form fields (HTTP 422 with `errors`).
        Validation { message: String, fields: FieldErrors } =>
            "backend validation failed: {message}",
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "backend transport failed: {message}",
        /// The request exceeded the transport timeout.
        Timeout { message: String } =>
            "backend timeout: {message}",
        /// Any other non-success status.
        Status { status: u16, message: String } =>
            "backend returned status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "backend response decode failed: {message}",
    }
}

impl GatewayError {
    /// Whether the failure means the bearer token is missing, invalid, or
    /// expired, which forces the session to reset.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Whether the failure is a connectivity problem rather than a backend
    /// decision.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}

fn message_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_owned()
    } else {
        message
    }
}

impl From<GatewayError> for Error {
    fn from(value: GatewayError) -> Self {
        match value {
            GatewayError::Unauthorized { message } => {
                Error::unauthorized(message_or(message, DEFAULT_UNAUTHORIZED))
            }
            GatewayError::Forbidden { message } => {
                Error::forbidden(message_or(message, DEFAULT_FORBIDDEN))
            }
            GatewayError::Validation { message, fields } => {
                Error::validation(fields, message_or(message, DEFAULT_VALIDATION))
            }
            GatewayError::Transport { .. } | GatewayError::Timeout { .. } => {
                Error::service_unavailable(UNREACHABLE)
            }
            GatewayError::Status { status, message } if status == 404 => {
                Error::not_found(message_or(message, "The requested resource was not found."))
            }
            GatewayError::Status { status, message } if (400..500).contains(&status) => {
                Error::invalid_request(message_or(message, UNEXPECTED_RESPONSE))
            }
            GatewayError::Status { .. } => Error::service_unavailable(UNREACHABLE),
            GatewayError::Decode { .. } => Error::internal(UNEXPECTED_RESPONSE),
        }
    }
}
