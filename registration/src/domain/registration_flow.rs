//! Form lifecycle around validation and submission.
//!
//! `RegistrationFlow` owns the form state machine:
//!
//! ```text
//! Idle -> Validating -> Invalid
//!                    -> Submitting -> Succeeded | Failed
//! ```
//!
//! A submission started while another is in flight is rejected with
//! [`SubmitReport::Busy`] and never reaches the registry.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{Instrument, debug, info_span, warn};

use crate::domain::TraceId;
use crate::domain::ports::UserRegistry;
use crate::domain::registration::{RawRegistration, ValidationErrors, validate};
use crate::domain::submission::{SubmissionOutcome, SubmissionService};

/// Message shown when a submission is attempted while one is in flight.
pub const BUSY_MESSAGE: &str = "A submission is already in progress.";

/// Observable state of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    /// Ready for input.
    #[default]
    Idle,
    /// Checking field rules.
    Validating,
    /// Showing field errors.
    Invalid,
    /// Waiting for the user service.
    Submitting,
    /// The last submission was accepted.
    Succeeded,
    /// The last submission failed.
    Failed,
}

impl FormState {
    const fn is_busy(self) -> bool {
        matches!(self, Self::Validating | Self::Submitting)
    }

    const fn is_terminal(self) -> bool {
        matches!(self, Self::Invalid | Self::Succeeded | Self::Failed)
    }
}

/// What happened to one `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReport {
    /// Another submission was in flight; nothing was validated or sent.
    Busy,
    /// Validation failed; messages are shown next to their fields.
    Invalid(ValidationErrors),
    /// The registry was called.
    Submitted(SubmissionOutcome),
}

impl SubmitReport {
    /// Single status line for the form, if this report has one.
    #[must_use]
    pub const fn status_message(&self) -> Option<&'static str> {
        match self {
            Self::Busy => Some(BUSY_MESSAGE),
            Self::Invalid(_) => None,
            Self::Submitted(outcome) => Some(outcome.message()),
        }
    }

    /// True only when the user service accepted the registration.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Submitted(SubmissionOutcome::Success))
    }
}

/// Stateful registration form: validates raw input and submits it once.
pub struct RegistrationFlow {
    submitter: SubmissionService,
    state: Mutex<FormState>,
}

impl RegistrationFlow {
    /// Build a flow in the [`FormState::Idle`] state.
    #[must_use]
    pub const fn new(registry: Arc<dyn UserRegistry>) -> Self {
        Self {
            submitter: SubmissionService::new(registry),
            state: Mutex::new(FormState::Idle),
        }
    }

    /// Current form state.
    #[must_use]
    pub fn state(&self) -> FormState {
        *lock(&self.state)
    }

    /// Record a user edit: terminal states return to [`FormState::Idle`].
    pub fn note_edit(&self) {
        let mut state = lock(&self.state);
        if state.is_terminal() {
            *state = FormState::Idle;
        }
    }

    /// Validate `raw` and, when valid, submit it.
    pub async fn submit(&self, raw: &RawRegistration) -> SubmitReport {
        let trace_id = TraceId::generate();
        let span = info_span!("registration_submit", trace_id = %trace_id);
        TraceId::scope(trace_id, self.run(raw).instrument(span)).await
    }

    async fn run(&self, raw: &RawRegistration) -> SubmitReport {
        if !self.begin() {
            warn!("submission rejected while another is in flight");
            return SubmitReport::Busy;
        }

        let input = match validate(raw) {
            Ok(input) => input,
            Err(errors) => {
                debug!(fields = ?errors.fields().collect::<Vec<_>>(), "registration input invalid");
                *lock(&self.state) = FormState::Invalid;
                return SubmitReport::Invalid(errors);
            }
        };

        let in_flight = InFlight::enter(&self.state);
        let outcome = self.submitter.submit(input).await;
        in_flight.settle(if outcome.is_success() {
            FormState::Succeeded
        } else {
            FormState::Failed
        });
        SubmitReport::Submitted(outcome)
    }

    fn begin(&self) -> bool {
        let mut state = lock(&self.state);
        if state.is_busy() {
            return false;
        }
        *state = FormState::Validating;
        true
    }
}

fn lock(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks the form as submitting; resets to idle if dropped before settling.
struct InFlight<'a> {
    state: &'a Mutex<FormState>,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn enter(state: &'a Mutex<FormState>) -> Self {
        *lock(state) = FormState::Submitting;
        Self {
            state,
            settled: false,
        }
    }

    fn settle(mut self, next: FormState) {
        *lock(self.state) = next;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            *lock(self.state) = FormState::Idle;
        }
    }
}
