//! Submission of validated registrations through the [`UserRegistry`] port.
//!
//! The service turns port results into a [`SubmissionOutcome`] with a fixed
//! user-facing message. Failure detail is logged and kept on the outcome for
//! callers that need it, but never appears in the message.

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::TraceId;
use crate::domain::ports::{UserRegistry, UserRegistryError};
use crate::domain::registration::RegistrationInput;

/// Message shown after the user service accepted the registration.
pub const SUCCESS_MESSAGE: &str = "User created successfully.";
/// Message shown for every submission failure.
pub const FAILURE_MESSAGE: &str = "Error creating user. Check the logs for more information.";

/// Result of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The user service accepted the registration.
    Success,
    /// The attempt failed; `reason` is for diagnostics only.
    Failure {
        /// Underlying port error.
        reason: UserRegistryError,
    },
}

impl SubmissionOutcome {
    /// User-visible status line.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Success => SUCCESS_MESSAGE,
            Self::Failure { .. } => FAILURE_MESSAGE,
        }
    }

    /// True when the registration was accepted.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Sends validated registrations to the injected registry, one attempt each.
#[derive(Clone)]
pub struct SubmissionService {
    registry: Arc<dyn UserRegistry>,
}

impl SubmissionService {
    /// Build a submission service over the given registry adapter.
    #[must_use]
    pub const fn new(registry: Arc<dyn UserRegistry>) -> Self {
        Self { registry }
    }

    /// Submit `input` once and report the outcome.
    ///
    /// The record is consumed; it is dropped as soon as the call resolves.
    pub async fn submit(&self, input: RegistrationInput) -> SubmissionOutcome {
        let trace_id = TraceId::current().map(|id| id.to_string());
        match self.registry.create_user(&input).await {
            Ok(()) => {
                info!(
                    trace_id = trace_id.as_deref(),
                    email = %input.email().masked(),
                    "user registration accepted"
                );
                SubmissionOutcome::Success
            }
            Err(reason) => {
                error!(
                    trace_id = trace_id.as_deref(),
                    email = %input.email().masked(),
                    error = %reason,
                    "user registration failed"
                );
                SubmissionOutcome::Failure { reason }
            }
        }
    }
}
