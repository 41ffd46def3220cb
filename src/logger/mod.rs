//! Logger Module
//!
//! Logging built on `tracing-subscriber` with:
//! - Console output with color control
//! - Optional file output in one of three formats (Full, Compact, JSON)
//! - Level filtering, overridable with `RUST_LOG`-style directives

pub mod config;
pub mod error;
pub(crate) mod writer;


pub use config::*;
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use writer::LogFileWriter;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the global logger with the given configuration
///
/// Fails if the configuration is invalid, the log file cannot be opened,
/// or a global subscriber is already installed.
pub fn init_logger(config: LoggerConfig) -> anyhow::Result<()> {
    config.validate()?;

    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let layers = build_layers(&config)?;

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LoggerError::config(format!("Logger already initialized: {}", e)))?;

    Ok(())
}

/// Output layers in registration order.
///
/// The file layer goes first so ANSI escapes from the console layer never
/// end up in the file (tokio-rs/tracing#1817).
fn build_layers(config: &LoggerConfig) -> Result<Vec<BoxedLayer>, LoggerError> {
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);

    if config.file.enabled {
        let writer = LogFileWriter::new(&config.file)?;
        let base = fmt::layer().with_ansi(false).with_writer(writer);

        layers.push(match config.file.format {
            LogFormat::Full => base.with_target(true).boxed(),
            LogFormat::Compact => base.with_target(true).compact().boxed(),
            LogFormat::Json => base.json().boxed(),
        });
    }

    if config.console.enabled {
        let use_ansi = config.console.colored && std::io::stdout().is_terminal();
        layers.push(
            fmt::layer()
                .with_ansi(use_ansi)
                .with_target(true)
                .with_level(true)
                .boxed(),
        );
    }

    Ok(layers)
}
