//! CLI argument parsing with clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::build;

/// Push notification relay for Firebase Cloud Messaging
#[derive(Parser, Debug)]
#[command(name = "pushnote")]
#[command(about = "Push notification relay for Firebase Cloud Messaging")]
#[command(long_about = "
pushnote relays push notifications to a single device or to a default
recipient through Firebase Cloud Messaging. It runs either as an HTTP
service or as a one-shot sender.

EXAMPLES:
    # Start the server with default configuration
    pushnote serve

    # Start server on custom host and port
    pushnote serve --host 0.0.0.0 --port 8080

    # Use custom configuration file
    pushnote --config /etc/pushnote/production.toml serve

    # Check configuration and credentials without starting the server
    pushnote serve --dry-run

    # Send one notification to the default recipient with random content
    pushnote send

    # Send an explicit notification to a given device
    pushnote send --token <FCM_TOKEN> --title Hello --message 'See you soon'
")]
#[command(version = build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load this single TOML file instead of the layered configuration
    /// directory. The file must exist and be readable.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection
    ///
    /// Selects the `{environment}.toml` layer. Takes precedence over
    /// PUSHNOTE_APP_ENV.
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    ///
    /// Examples:
    ///   pushnote serve                           # Start with defaults
    ///   pushnote serve --host 0.0.0.0 --port 80  # Bind to all interfaces on port 80
    ///   pushnote serve --dry-run                 # Validate config without starting
    Serve {
        /// Host address to bind to
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on (1-65535)
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Log level override, wins over --verbose/--quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and credentials, then exit
        ///
        /// Returns exit code 0 if the server could start, non-zero otherwise.
        #[arg(long)]
        dry_run: bool,
    },
    /// Send one notification and print the result as JSON
    ///
    /// Uses the configured dispatch variant. Omitted values fall back to the
    /// default recipient and, in the basic variant, to random content.
    /// Exits non-zero when the notification was not sent.
    Send {
        /// Recipient registration token
        #[arg(long, value_name = "FCM_TOKEN")]
        token: Option<String>,

        /// Notification title
        #[arg(long)]
        title: Option<String>,

        /// Notification body
        #[arg(short, long)]
        message: Option<String>,

        /// Free-form tag stored with the delivery log entry
        #[arg(long, value_name = "TAG")]
        time_window: Option<String>,
    },
}

/// Environment options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

/// Log level options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogLevel {
    #[value(name = "error")]
    Error,
    #[value(name = "warn", alias = "warning")]
    Warn,
    #[value(name = "info")]
    Info,
    #[value(name = "debug")]
    Debug,
    #[value(name = "trace")]
    Trace,
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => "error".to_string(),
            LogLevel::Warn => "warn".to_string(),
            LogLevel::Info => "info".to_string(),
            LogLevel::Debug => "debug".to_string(),
            LogLevel::Trace => "trace".to_string(),
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}
