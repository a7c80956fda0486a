//! User service settings loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::users_api::users_endpoint;

/// Base URL used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The base URL is not a valid absolute URL.
    #[error("invalid user service base URL {value:?}: {source}")]
    InvalidBaseUrl {
        /// Offending value.
        value: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The base URL does not use HTTP or HTTPS.
    #[error("user service base URL {value:?} must use http or https")]
    UnsupportedScheme {
        /// Offending value.
        value: String,
    },
}

/// Configuration for reaching the user service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REGISTRATION")]
pub struct RegistrationSettings {
    /// Base URL of the user service; registrations go to `<base>/users`.
    pub base_url: Option<String>,
}

impl RegistrationSettings {
    /// Return the configured base URL, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the value is not an HTTP(S) URL.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let value = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL).trim();
        let url = Url::parse(value).map_err(|source| SettingsError::InvalidBaseUrl {
            value: value.to_owned(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SettingsError::UnsupportedScheme {
                value: value.to_owned(),
            });
        }
        Ok(url)
    }

    /// Return the user creation endpoint beneath the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the base URL is unusable.
    pub fn users_endpoint(&self) -> Result<Url, SettingsError> {
        let base = self.base_url()?;
        users_endpoint(&base).map_err(|source| SettingsError::InvalidBaseUrl {
            value: base.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for user service configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> RegistrationSettings {
        RegistrationSettings::load_from_iter([OsString::from("registration")])
            .expect("config should load")
    }

    fn settings(base_url: &str) -> RegistrationSettings {
        RegistrationSettings {
            base_url: Some(base_url.to_owned()),
        }
    }

    #[rstest]
    fn default_endpoint_is_used_when_missing() {
        let _guard = lock_env([("REGISTRATION_BASE_URL", None::<String>)]);

        let settings = load_from_empty_args();
        assert!(settings.base_url.is_none());
        assert_eq!(
            settings.users_endpoint().expect("default endpoint").as_str(),
            "http://localhost:3000/users"
        );
    }

    #[rstest]
    fn environment_override_is_respected() {
        let _guard = lock_env([(
            "REGISTRATION_BASE_URL",
            Some("https://users.example.com/api".to_owned()),
        )]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.users_endpoint().expect("override endpoint").as_str(),
            "https://users.example.com/api/users"
        );
    }

    #[rstest]
    #[case("not a url")]
    #[case("localhost:3000")]
    #[case("ftp://files.example.com")]
    fn rejects_unusable_base_urls(#[case] value: &str) {
        assert!(settings(value).base_url().is_err(), "{value} should be rejected");
    }

    #[rstest]
    fn reports_unsupported_scheme() {
        let error = settings("ftp://files.example.com")
            .base_url()
            .expect_err("ftp must be rejected");
        assert_eq!(
            error,
            SettingsError::UnsupportedScheme {
                value: "ftp://files.example.com".to_owned()
            }
        );
    }
}
