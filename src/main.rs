use std::process::ExitCode;

use clap::Parser as _;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use workflow_dispatch::{
    AmbientContext, Outcome, RawInputs, actions,
    env::{GITHUB_API_URL, STEP_DEBUG},
    run,
};

#[tokio::main]
async fn main() -> ExitCode {
    let default_level = if *STEP_DEBUG { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let raw = RawInputs::parse();
    let ambient = AmbientContext::current();
    debug!("using GitHub API at {}…", &*GITHUB_API_URL);

    match run(raw, &ambient).await {
        Outcome::Success { status } => {
            info!("API response status: {} 🚀", status.as_u16());
            ExitCode::SUCCESS
        }
        Outcome::Failure { message, .. } => {
            actions::set_failed(&message);
            ExitCode::FAILURE
        }
        _ => ExitCode::FAILURE,
    }
}
