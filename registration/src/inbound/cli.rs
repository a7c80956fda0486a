//! Terminal front end for the registration form.
//!
//! Flags stand in for the form inputs. Every flag is optional so that missing
//! values surface as field-level validation errors rather than argument
//! parsing failures.

use clap::Parser;

use crate::domain::{RawRegistration, SubmitReport};

/// Register a user with the user service.
#[derive(Parser)]
#[command(name = "registration", version, about)]
pub struct FormArgs {
    /// Full name.
    #[arg(long, default_value = "")]
    pub name: String,
    /// Age in whole years.
    #[arg(long, allow_hyphen_values = true)]
    pub age: Option<String>,
    /// Email address.
    #[arg(long, default_value = "")]
    pub email: String,
    /// Password, at least six characters.
    #[arg(long, default_value = "")]
    pub password: String,
}

impl FormArgs {
    /// Convert parsed flags into raw form input.
    #[must_use]
    pub fn into_raw(self) -> RawRegistration {
        RawRegistration {
            name: self.name,
            age: self.age,
            email: self.email,
            password: self.password,
        }
    }
}

/// Lines to display for a submission report.
///
/// Invalid input yields one `field: message` line per failing field in form
/// order; every other report yields its status message.
#[must_use]
pub fn render_report(report: &SubmitReport) -> Vec<String> {
    match report {
        SubmitReport::Invalid(errors) => errors
            .iter()
            .map(|(field, error)| format!("{field}: {error}"))
            .collect(),
        other => other
            .status_message()
            .map(str::to_owned)
            .into_iter()
            .collect(),
    }
}
