//! Driven port for creating users on the remote user service.
//!
//! The domain hands over a validated [`RegistrationInput`]; adapters own the
//! wire format, headers, and HTTP status interpretation.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::registration::RegistrationInput;

define_port_error! {
    /// Errors surfaced while creating a user remotely.
    ///
    /// Every variant is a transport error from the user's point of view; the
    /// detail is for diagnostics only.
    pub enum UserRegistryError {
        /// Request could not be sent or the response could not be read.
        Transport { message: String } =>
            "user service transport failed: {message}",
        /// Transport gave up waiting for the service.
        Timeout { message: String } =>
            "user service timeout: {message}",
        /// Service answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "user service rejected registration with status {status}: {message}",
        /// Registration payload could not be serialised.
        Encode { message: String } =>
            "registration payload encode failed: {message}",
    }
}

/// Port for submitting a validated registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistry: Send + Sync {
    /// Create one user from a validated registration. Exactly one attempt is
    /// made; callers receive the first failure.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use registration::domain::ports::{FixtureUserRegistry, UserRegistry};
    ///
    /// let registry = FixtureUserRegistry;
    /// registry.create_user(&input).await?;
    /// # Ok::<(), registration::domain::ports::UserRegistryError>(())
    /// ```
    async fn create_user(&self, input: &RegistrationInput) -> Result<(), UserRegistryError>;
}

/// Fixture implementation that accepts every registration.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureUserRegistry;

#[async_trait]
impl UserRegistry for FixtureUserRegistry {
    async fn create_user(&self, _input: &RegistrationInput) -> Result<(), UserRegistryError> {
        Ok(())
    }
}
