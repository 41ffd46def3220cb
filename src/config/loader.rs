//! Configuration loader for pushnote
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! configuration from multiple sources with proper precedence.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
const CONFIG_DIR_ENV: &str = "PUSHNOTE_CONFIG_DIR";

/// Environment variable for specific configuration file
const CONFIG_FILE_ENV: &str = "PUSHNOTE_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "PUSHNOTE";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Unprefixed variables understood by existing deployments, mapped to
/// their configuration keys. These win over every other source.
const LEGACY_OVERRIDES: &[(&str, &str)] = &[
    ("FIREBASE_CRED_JSON", "firebase.credentials"),
    ("DEFAULT_FCM_TOKEN", "dispatch.default_token"),
    ("PORT", "server.port"),
];

type Builder = ConfigBuilder<DefaultState>;

/// Configuration loader that handles layered configuration loading
///
/// Sources, lowest priority first:
/// 1. built-in defaults
/// 2. `default.toml`
/// 3. `{environment}.toml`
/// 4. `local.toml`
/// 5. `PUSHNOTE_*` environment variables
/// 6. `FIREBASE_CRED_JSON`, `DEFAULT_FCM_TOKEN`, `PORT`
///
/// Every file layer is optional: the service can run from environment
/// variables alone.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    /// Specific configuration file path (if set, skips layered loading)
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a new configuration loader from the process environment
    ///
    /// Reads `PUSHNOTE_CONFIG_DIR`, `PUSHNOTE_CONFIG_FILE` and
    /// `PUSHNOTE_APP_ENV`.
    ///
    /// # Errors
    ///
    /// Returns an error if both `PUSHNOTE_CONFIG_DIR` and
    /// `PUSHNOTE_CONFIG_FILE` are set.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir_var = std::env::var(CONFIG_DIR_ENV).ok();
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && config_dir_var.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "PUSHNOTE_CONFIG_DIR and PUSHNOTE_CONFIG_FILE cannot both be set. \
                 Use PUSHNOTE_CONFIG_DIR for layered configuration or \
                 PUSHNOTE_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir: config_dir_var
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Use a single configuration file instead of the layered directory
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Override the detected environment
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Load and validate configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - an explicitly named configuration file does not exist
    /// - configuration parsing fails
    /// - configuration validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match self.config_file {
            Some(ref config_file) => Self::add_file_source(builder, config_file, true)?,
            None => self.build_layered_config(builder)?,
        };

        // PUSHNOTE_SERVER__PORT -> server.port
        let builder = Self::add_env_source(builder);
        let builder = Self::add_legacy_overrides(builder)?;

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(&self, builder: Builder) -> Result<Builder, ConfigError> {
        let layers = [
            "default.toml".to_string(),
            format!("{}.toml", self.environment.as_str()),
            "local.toml".to_string(),
        ];

        layers.iter().try_fold(builder, |builder, name| {
            Self::add_file_source(builder, &self.config_dir.join(name), false)
        })
    }

    fn add_file_source(
        builder: Builder,
        path: &Path,
        required: bool,
    ) -> Result<Builder, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        Ok(builder.add_source(
            File::new(&path.to_string_lossy(), FileFormat::Toml).required(required),
        ))
    }

    fn add_env_source(builder: Builder) -> Builder {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        )
    }

    fn add_legacy_overrides(builder: Builder) -> Result<Builder, ConfigError> {
        LEGACY_OVERRIDES
            .iter()
            .try_fold(builder, |builder, (var, key)| {
                let value = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
                builder.set_override_option(*key, value)
            })
            .map_err(ConfigError::from)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
            environment: AppEnvironment::default(),
        })
    }
}
