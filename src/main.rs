use anyhow::Context;
use clap::Parser;
use pgcheck::cli::Args;
use pgcheck::config::{self, ConnectionParams};
use pgcheck::logging::setup_logging;
use pgcheck::{check, report};
use std::process::ExitCode;
use tracing::{debug, error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(&args.log_level, args.tracing);

    info!(version = env!("CARGO_PKG_VERSION"), "starting pgcheck");

    // Every outcome is reported on stdout; the exit status is always success.
    let params = match load_params(&args) {
        Ok(params) => params,
        Err(e) => {
            error!(error = ?e, "configuration could not be loaded");
            println!("{}", report::failure_line(&format!("{e:#}")));
            return ExitCode::SUCCESS;
        }
    };

    let outcome = check::run(&params).await;
    if let Err(e) = &outcome {
        error!(error = %e, reached_server = e.reached_server(), "connectivity check failed");
    }

    for line in report::render(&outcome) {
        println!("{line}");
    }
    ExitCode::SUCCESS
}

fn load_params(args: &Args) -> anyhow::Result<ConnectionParams> {
    let env_file = args.env_file();
    let params = config::load(&env_file).context("failed to load connection parameters")?;
    debug!(?env_file, ?params, "connection parameters loaded");
    Ok(params)
}
