//! Barangay account registration.
//!
//! The form is submitted as multipart data; the backend owns every business
//! rule (duplicate e-mail, password policy) and reports violations per
//! field. Local checks only reject blank required fields.

use zeroize::Zeroizing;

use super::{Error, FieldErrors, LoginCredentials, User};

/// Registration form as entered by a barangay official.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    /// Full name of the official.
    pub name: String,
    /// Login e-mail address.
    pub email: String,
    /// Chosen password.
    pub password: Zeroizing<String>,
    /// Password repeated for confirmation; compared by the backend.
    pub password_confirmation: Zeroizing<String>,
    /// Barangay the account represents.
    pub barangay_name: String,
    /// Municipality the barangay belongs to.
    pub municipality: String,
    /// Optional contact number.
    pub contact_number: Option<String>,
}

impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("barangay_name", &self.barangay_name)
            .field("municipality", &self.municipality)
            .field("contact_number", &self.contact_number)
            .finish_non_exhaustive()
    }
}

impl RegistrationForm {
    /// Reject blank required fields before any network call.
    ///
    /// Errors use [`crate::domain::ErrorCode::Validation`] with one message
    /// per blank field so they map onto the same form fields as backend
    /// errors.
    pub fn validate(&self) -> Result<(), Error> {
        let mut fields = FieldErrors::new();
        let required = [
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
            ("password_confirmation", self.password_confirmation.as_str()),
            ("barangay_name", self.barangay_name.as_str()),
            ("municipality", self.municipality.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                fields.push(field, format!("The {} field is required.", field.replace('_', " ")));
            }
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(Error::validation(fields, "registration form is incomplete"))
        }
    }

    /// Credentials for the follow-up sign-in after registration.
    pub fn credentials(&self) -> Result<LoginCredentials, Error> {
        LoginCredentials::try_from_parts(&self.email, &self.password)
            .map_err(|err| Error::invalid_request(err.to_string()))
    }

    /// Text fields in submission order, as `(name, value)` pairs.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.trim().to_owned()),
            ("email", self.email.trim().to_owned()),
            ("password", self.password.as_str().to_owned()),
            (
                "password_confirmation",
                self.password_confirmation.as_str().to_owned(),
            ),
            ("barangay_name", self.barangay_name.trim().to_owned()),
            ("municipality", self.municipality.trim().to_owned()),
            ("role", "barangay".to_owned()),
        ];
        if let Some(contact) = self
            .contact_number
            .as_deref()
            .map(str::trim)
            .filter(|contact| !contact.is_empty())
        {
            fields.push(("contact_number", contact.to_owned()));
        }
        fields
    }
}

/// Backend acknowledgement of a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationAck {
    /// Message from the backend, e.g. "awaiting approval".
    pub message: String,
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    /// Backend confirmation message.
    pub message: String,
    /// User signed in by the follow-up login, when it succeeded.
    pub signed_in: Option<User>,
}
