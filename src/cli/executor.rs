//! Dispatches parsed CLI commands to their handlers.

use std::process::ExitCode;

use super::handlers::{SendCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppResult;
use crate::models::NotificationRequest;

/// Execute a CLI command with merged settings
///
/// No subcommand means `serve`. A `send` whose notification was not
/// delivered yields a failing exit code without being an error.
pub async fn execute_command(cli: Cli, settings: Settings) -> AppResult<ExitCode> {
    match cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(dry_run).await?;
        }
        None => {
            ServeCommandHandler::new(settings).execute(false).await?;
        }
        Some(Commands::Send {
            token,
            title,
            message,
            time_window,
        }) => {
            let request = NotificationRequest::new(token, title, message, time_window);
            let result = SendCommandHandler::from_settings(&settings)?
                .execute(request)
                .await?;

            if !result.success {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
