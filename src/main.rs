use std::process::ExitCode;

use clap::Parser;
use pushnote::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let settings = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    tracing::debug!(version = pushnote::pkg_version(), "Configuration loaded");

    let code = execute_command(cli, settings)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Command failed"))?;

    Ok(code)
}
