//! Registration entry-point: reads form fields from flags, validates them, and
//! submits valid registrations to the user service.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use registration::config::RegistrationSettings;
use registration::domain::RegistrationFlow;
use registration::inbound::cli::{FormArgs, render_report};
use registration::outbound::users_api::HttpUserRegistry;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let form = FormArgs::parse();
    let settings = RegistrationSettings::load_from_iter([OsString::from("registration")])
        .map_err(|e| eyre!("failed to load registration settings: {e}"))?;
    let endpoint = settings.users_endpoint()?;
    let registry =
        HttpUserRegistry::new(endpoint).wrap_err("failed to build user service client")?;
    let flow = RegistrationFlow::new(Arc::new(registry));

    let report = flow.submit(&form.into_raw()).await;

    let mut stdout = io::stdout().lock();
    for line in render_report(&report) {
        writeln!(stdout, "{line}")?;
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
