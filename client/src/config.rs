//! Portal client configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `PORTAL_*` environment variables, or a
//! configuration file, and are read once at startup.

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
const DEFAULT_STATE_DIR: &str = ".portal";
const DEFAULT_TOKEN_FILE: &str = "session.token";

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The backend base URL does not parse.
    #[error("invalid api_base_url {value:?}: {message}")]
    InvalidBaseUrl {
        /// Offending value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// The base URL uses a scheme other than http or https.
    #[error("api_base_url must use http or https, got {scheme}")]
    UnsupportedScheme {
        /// Offending scheme.
        scheme: String,
    },
    /// The request timeout is zero.
    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

/// Configuration for the portal client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Backend API base URL, e.g. `https://portal.example.ph/api`.
    pub api_base_url: Option<String>,
    /// Per-request transport timeout, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Directory holding client state such as the token file.
    pub state_dir: Option<String>,
    /// Token file name inside `state_dir`.
    pub token_file: Option<String>,
}

impl PortalSettings {
    /// Validated backend base URL, falling back to the local default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the value is not an http(s) URL.
    pub fn api_base_url(&self) -> Result<Url, SettingsError> {
        let raw = self
            .api_base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL);
        let url = Url::parse(raw).map_err(|err| SettingsError::InvalidBaseUrl {
            value: raw.to_owned(),
            message: err.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(SettingsError::UnsupportedScheme {
                scheme: other.to_owned(),
            }),
        }
    }

    /// Per-request timeout, falling back to 15 seconds.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] for a zero timeout.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS) {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// State directory, falling back to `.portal`.
    pub fn state_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.state_dir.as_deref().unwrap_or(DEFAULT_STATE_DIR))
    }

    /// Token file name, falling back to `session.token`.
    pub fn token_file(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.token_file.as_deref().unwrap_or(DEFAULT_TOKEN_FILE))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for portal configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "PORTAL_API_BASE_URL",
        "PORTAL_REQUEST_TIMEOUT_SECS",
        "PORTAL_STATE_DIR",
        "PORTAL_TOKEN_FILE",
    ];

    fn load_from_empty_args() -> PortalSettings {
        PortalSettings::load_from_iter([OsString::from("portal-dashboard")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_base_url().expect("default url").as_str(),
            "http://localhost:8000/api"
        );
        assert_eq!(
            settings.request_timeout().expect("default timeout"),
            Duration::from_secs(15)
        );
        assert_eq!(settings.state_dir(), Utf8PathBuf::from(".portal"));
        assert_eq!(settings.token_file(), Utf8PathBuf::from("session.token"));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "PORTAL_API_BASE_URL",
                Some("https://portal.example.ph/api".to_owned()),
            ),
            ("PORTAL_REQUEST_TIMEOUT_SECS", Some("3".to_owned())),
            ("PORTAL_STATE_DIR", Some("/var/lib/portal".to_owned())),
            ("PORTAL_TOKEN_FILE", Some("admin.token".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.api_base_url().expect("url").host_str(),
            Some("portal.example.ph")
        );
        assert_eq!(
            settings.request_timeout().expect("timeout"),
            Duration::from_secs(3)
        );
        assert_eq!(settings.state_dir(), Utf8PathBuf::from("/var/lib/portal"));
        assert_eq!(settings.token_file(), Utf8PathBuf::from("admin.token"));
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://portal.example.ph")]
    fn invalid_base_urls_are_rejected(#[case] raw: &str) {
        let settings = PortalSettings {
            api_base_url: Some(raw.to_owned()),
            request_timeout_secs: None,
            state_dir: None,
            token_file: None,
        };
        assert!(settings.api_base_url().is_err());
    }

    #[rstest]
    fn zero_timeout_is_rejected() {
        let settings = PortalSettings {
            api_base_url: None,
            request_timeout_secs: Some(0),
            state_dir: None,
            token_file: None,
        };
        assert_eq!(settings.request_timeout(), Err(SettingsError::ZeroTimeout));
    }
}
