//! Authentication primitives: login credentials and bearer tokens.
//!
//! Keep raw input parsing outside the session manager by exposing
//! constructors that validate string inputs before any port is called.

use std::fmt;

use zeroize::Zeroizing;

use super::User;

/// Domain error returned when login or token values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// E-mail was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
    /// Token was blank or contained characters not allowed in a header.
    MalformedToken,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::MalformedToken => write!(f, "access token is malformed"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the authentication gateway.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use portal_client::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" a@b.com ", "secret").unwrap();
/// assert_eq!(creds.email(), "a@b.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw e-mail/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// E-mail used as the login identifier.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Bearer credential issued by the backend.
///
/// The value is zeroed on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Validate a raw token string.
    ///
    /// Surrounding whitespace is trimmed; the remainder must be non-empty
    /// visible ASCII so it can be sent as an `Authorization` header.
    pub fn parse(raw: &str) -> Result<Self, LoginValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_graphic()) {
            return Err(LoginValidationError::MalformedToken);
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Raw token text for the transport layer and the token store.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Successful authentication: a fresh token and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    /// Bearer token to persist and attach to later calls.
    pub token: AccessToken,
    /// Authorization facts for the signed-in user.
    pub user: User,
}
