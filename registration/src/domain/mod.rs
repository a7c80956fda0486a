//! Domain primitives and services for user registration.
//!
//! Purpose: validate raw form input into a typed record, submit it through the
//! [`ports::UserRegistry`] port, and track the form's lifecycle. Nothing in
//! this module performs I/O directly; adapters live under `outbound`.
//!
//! Public surface:
//! - [`validate`] and [`RegistrationInput`]: the validator and its output.
//! - [`SubmissionService`] and [`SubmissionOutcome`]: one submission attempt.
//! - [`RegistrationFlow`]: the stateful form that rejects overlapping submits.

pub mod ports;
pub mod registration;
pub mod registration_flow;
pub mod submission;
pub mod trace_id;

pub use self::registration::{
    AGE_MAX, AGE_MIN, Age, EmailAddress, Field, FieldError, FieldErrorKind, PASSWORD_MIN_CHARS,
    Password, PersonName, RawRegistration, RegistrationInput, ValidationErrors, ValidationResult,
    validate,
};
pub use self::registration_flow::{BUSY_MESSAGE, FormState, RegistrationFlow, SubmitReport};
pub use self::submission::{
    FAILURE_MESSAGE, SUCCESS_MESSAGE, SubmissionOutcome, SubmissionService,
};
pub use self::trace_id::TraceId;
