//! Reqwest-backed user service adapter.
//!
//! This adapter owns transport details only: JSON serialisation of the
//! registration, the `Content-Type` header, and mapping transport failures and
//! HTTP statuses onto [`UserRegistryError`]. Response bodies of successful
//! calls are ignored. Error bodies are read only as far as a short preview
//! needs, within a bounded wait, so a stalled body never holds up the outcome.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode, Url};
use tokio::time::timeout;
use tracing::debug;

use super::dto::CreateUserRequestDto;
use crate::domain::RegistrationInput;
use crate::domain::ports::{UserRegistry, UserRegistryError};

/// Path of the user creation resource, relative to the service base URL.
pub const USERS_PATH: &str = "users";

/// Longest wait for the body of a non-success response.
pub const DEFAULT_ERROR_BODY_TIMEOUT: Duration = Duration::from_secs(2);

const JSON_CONTENT_TYPE: &str = "application/json";
const ERROR_BODY_BYTE_LIMIT: usize = 4096;

/// Resolve the user creation endpoint beneath `base_url`.
///
/// Any path on the base URL is kept, so `http://host/api` resolves to
/// `http://host/api/users`.
///
/// # Examples
/// ```
/// use registration::outbound::users_api::users_endpoint;
/// use url::Url;
///
/// let base = Url::parse("http://localhost:3000").unwrap();
/// assert_eq!(users_endpoint(&base).unwrap().as_str(), "http://localhost:3000/users");
/// ```
///
/// # Errors
///
/// Returns an error when the base URL cannot carry a path.
pub fn users_endpoint(base_url: &Url) -> Result<Url, url::ParseError> {
    let mut base = base_url.clone();
    base.set_query(None);
    base.set_fragment(None);
    if !base.path().ends_with('/') {
        let directory = format!("{}/", base.path());
        base.set_path(&directory);
    }
    base.join(USERS_PATH)
}

/// User registry adapter that POSTs registrations to one endpoint.
pub struct HttpUserRegistry {
    client: Client,
    endpoint: Url,
    error_body_timeout: Duration,
}

impl HttpUserRegistry {
    /// Build an adapter with reqwest's default transport settings.
    ///
    /// # Examples
    /// ```
    /// use registration::outbound::users_api::{HttpUserRegistry, users_endpoint};
    /// use url::Url;
    ///
    /// let endpoint = users_endpoint(&Url::parse("http://localhost:3000").unwrap()).unwrap();
    /// let registry = HttpUserRegistry::new(endpoint).unwrap();
    /// assert_eq!(registry.endpoint().path(), "/users");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Build an adapter around an existing client.
    #[must_use]
    pub const fn with_client(client: Client, endpoint: Url) -> Self {
        Self {
            client,
            endpoint,
            error_body_timeout: DEFAULT_ERROR_BODY_TIMEOUT,
        }
    }

    /// Replace the wait allowed for the body of a non-success response.
    #[must_use]
    pub const fn with_error_body_timeout(mut self, wait: Duration) -> Self {
        self.error_body_timeout = wait;
        self
    }

    /// Endpoint receiving registrations.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl UserRegistry for HttpUserRegistry {
    async fn create_user(&self, input: &RegistrationInput) -> Result<(), UserRegistryError> {
        let body = encode_registration(input)?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            debug!(status = status.as_u16(), endpoint = %self.endpoint, "user created");
            return Ok(());
        }

        let body = read_error_body(response, self.error_body_timeout).await;
        Err(map_status_error(status, &body))
    }
}

/// Collect up to `ERROR_BODY_BYTE_LIMIT` bytes of an error body, keeping
/// whatever arrived before `wait` elapsed or the stream failed.
async fn read_error_body(mut response: Response, wait: Duration) -> Vec<u8> {
    let mut body = Vec::new();
    let read = async {
        while body.len() < ERROR_BODY_BYTE_LIMIT {
            match response.chunk().await {
                Ok(Some(chunk)) => body.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(error) => {
                    debug!(error = %error, "error body read failed");
                    break;
                }
            }
        }
    };
    if timeout(wait, read).await.is_err() {
        debug!(wait = ?wait, "error body read timed out");
    }
    body.truncate(ERROR_BODY_BYTE_LIMIT);
    body
}

fn encode_registration(input: &RegistrationInput) -> Result<Vec<u8>, UserRegistryError> {
    serde_json::to_vec_pretty(&CreateUserRequestDto::from(input))
        .map_err(|error| UserRegistryError::encode(error.to_string()))
}

fn map_transport_error(error: reqwest::Error) -> UserRegistryError {
    if error.is_timeout() {
        UserRegistryError::timeout(error.to_string())
    } else {
        UserRegistryError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> UserRegistryError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_owned()
    } else {
        preview
    };
    UserRegistryError::rejected(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
