//! Merges CLI overrides into file and environment configuration.
//!
//! Precedence, lowest to highest: configuration layers, `--verbose` or
//! `--quiet`, then subcommand flags.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base configuration honouring `--config` and `--env`
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;

        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }
        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path.clone());
        }

        Ok(Self::new(loader.load()?))
    }

    /// Apply CLI overrides and validate the result
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = (*level).into();
            }
        }

        config.validate()?;

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn merge(args: &[&str]) -> Result<Settings, ConfigError> {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(Settings::default()).merge_cli_args(&cli)
    }

    #[test]
    fn test_merger_keeps_base_config() {
        let merger = ConfigurationMerger::new(Settings::default());
        assert_eq!(merger.config(), &Settings::default());
    }

    #[test]
    fn test_verbose_and_quiet_flags() {
        assert_eq!(merge(&["pushnote", "--verbose"]).unwrap().logger.level, "debug");
        assert_eq!(merge(&["pushnote", "--quiet"]).unwrap().logger.level, "error");
    }

    #[test]
    fn test_serve_host_and_port() {
        let config = merge(&["pushnote", "serve", "--host", "0.0.0.0", "--port", "8080"]).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let config = merge(&["pushnote", "--verbose", "serve", "--log-level", "warn"]).unwrap();
        assert_eq!(config.logger.level, "warn");
    }

    #[test]
    fn test_send_leaves_server_untouched() {
        let config = merge(&["pushnote", "send", "--title", "Hi"]).unwrap();
        assert_eq!(config.server, Settings::default().server);
    }

    #[test]
    fn test_merged_config_is_validated() {
        let mut base = Settings::default();
        base.content.titles = vec![" ".to_string()];
        let cli = Cli::try_parse_from(["pushnote"]).unwrap();
        assert!(ConfigurationMerger::new(base).merge_cli_args(&cli).is_err());
    }
}
