//! Command-line interface: argument parsing, configuration merging and
//! command execution.

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, Environment, LogLevel};

use crate::config::Settings;
use crate::logger::init_logger;

/// Load configuration layers and apply CLI overrides
///
/// # Errors
/// Returns error if loading, merging or validation fails
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    let merger = ConfigurationMerger::from_cli(cli)?;
    Ok(merger.merge_cli_args(cli)?)
}

/// Install the global logger described by `settings`
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    let logger_config = settings.logger.clone().into_logger_config()?;
    init_logger(logger_config)
}
