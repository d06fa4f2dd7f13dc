//! User identity and authorization facts.
//!
//! Users are only ever constructed from backend payloads (login, session
//! confirmation). The client never derives `role` or `status` locally.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned when building a [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier was missing or blank.
    EmptyId,
    /// The e-mail address was missing or blank.
    EmptyEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::EmptyEmail => write!(f, "user email must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Opaque backend user identifier.
///
/// The backend may send ids as JSON numbers or strings; both are kept as
/// their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawId", into = "String")]
pub struct UserId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Ok(Self(id))
    }
}

impl TryFrom<RawId> for UserId {
    type Error = UserValidationError;

    fn try_from(value: RawId) -> Result<Self, Self::Error> {
        match value {
            RawId::Number(number) => Self::new(number.to_string()),
            RawId::Text(text) => Self::new(text),
        }
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Account role. Immutable for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Municipal administrator; implicitly approved.
    Admin,
    /// Barangay (village) official whose access depends on approval.
    Barangay,
}

/// Backend-assigned approval state for barangay accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Account may use barangay features.
    Approved,
    /// Account is awaiting administrator review.
    Pending,
    /// Account was refused by an administrator.
    Rejected,
}

/// Authenticated portal user.
///
/// ## Invariants
/// - `id` and `email` are non-empty.
/// - `status` is exactly what the backend reported; it is only meaningful
///   for [`Role::Barangay`].
///
/// # Examples
/// ```
/// use portal_client::domain::{ApprovalStatus, Role, User};
///
/// let user: User = serde_json::from_str(
///     r#"{"id": 7, "name": "Kap. Santos", "email": "santos@example.ph",
///         "role": "barangay", "status": "pending",
///         "barangay_name": "San Isidro"}"#,
/// )
/// .unwrap();
/// assert_eq!(user.role(), Role::Barangay);
/// assert_eq!(user.status(), Some(ApprovalStatus::Pending));
/// assert_eq!(user.barangay_name(), Some("San Isidro"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    role: Role,
    status: Option<ApprovalStatus>,
    barangay_name: Option<String>,
    municipality: Option<String>,
}

impl User {
    /// Start building a user from its required facts.
    pub fn builder(id: UserId, email: impl Into<String>, role: Role) -> UserBuilder {
        UserBuilder {
            id,
            name: String::new(),
            email: email.into(),
            role,
            status: None,
            barangay_name: None,
            municipality: None,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Login e-mail address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Account role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Approval state as reported by the backend.
    pub fn status(&self) -> Option<ApprovalStatus> {
        self.status
    }

    /// Barangay the account belongs to, if any.
    pub fn barangay_name(&self) -> Option<&str> {
        self.barangay_name.as_deref()
    }

    /// Municipality the account belongs to, if any.
    pub fn municipality(&self) -> Option<&str> {
        self.municipality.as_deref()
    }
}

/// Builder for [`User`], mainly used by fixtures and tests.
#[derive(Debug, Clone)]
pub struct UserBuilder {
    id: UserId,
    name: String,
    email: String,
    role: Role,
    status: Option<ApprovalStatus>,
    barangay_name: Option<String>,
    municipality: Option<String>,
}

impl UserBuilder {
    /// Set the display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the backend approval status.
    pub fn status(mut self, status: ApprovalStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the barangay name.
    pub fn barangay_name(mut self, barangay_name: impl Into<String>) -> Self {
        self.barangay_name = Some(barangay_name.into());
        self
    }

    /// Set the municipality.
    pub fn municipality(mut self, municipality: impl Into<String>) -> Self {
        self.municipality = Some(municipality.into());
        self
    }

    /// Validate and build the user.
    pub fn build(self) -> Result<User, UserValidationError> {
        if self.email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        Ok(User {
            id: self.id,
            name: self.name,
            email: self.email,
            role: self.role,
            status: self.status,
            barangay_name: self.barangay_name,
            municipality: self.municipality,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDto {
    id: UserId,
    #[serde(default)]
    name: String,
    email: String,
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<ApprovalStatus>,
    #[serde(
        default,
        alias = "barangayName",
        skip_serializing_if = "Option::is_none"
    )]
    barangay_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    municipality: Option<String>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            name,
            email,
            role,
            status,
            barangay_name,
            municipality,
        } = value;
        Self {
            id,
            name,
            email,
            role,
            status,
            barangay_name,
            municipality,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let mut builder = User::builder(value.id, value.email, value.role).name(value.name);
        builder.status = value.status;
        builder.barangay_name = value.barangay_name;
        builder.municipality = value.municipality;
        builder.build()
    }
}
