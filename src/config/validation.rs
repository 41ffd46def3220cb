//! Configuration validation logic
//!
//! This module provides validation methods for all configuration structures
//! to ensure configuration values are within acceptable ranges and formats.

use crate::config::error::ConfigError;
use crate::config::settings::{
    ContentConfig, DeliveryLogConfig, FileSettings, FirebaseConfig, LoggerSettings, ServerConfig,
    Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Host must not be empty
    /// - Port must be between 1 and 65535
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "server.host",
                "Host is required. Use 0.0.0.0 to listen on all interfaces.",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    /// Validate file settings
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// # Validation Rules
    /// - Log level must be one of: trace, debug, info, warn, error
    /// - If file logging is enabled, path must not be empty
    /// - Log format must be one of: full, compact, json
    /// - At least one output must be enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()?;

        Ok(())
    }
}

impl FirebaseConfig {
    /// Validate Firebase settings
    ///
    /// Presence of credentials is checked when the provider client is built,
    /// so `serve --dry-run` and startup report the same failure.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.credentials.as_deref().is_some_and(|c| !c.trim().is_empty())
            && self.credentials_file.is_some()
        {
            return Err(ConfigError::mutual_exclusivity(
                "firebase.credentials and firebase.credentials_file cannot both be set.",
            ));
        }

        if !is_http_url(&self.fcm_endpoint) {
            return Err(ConfigError::validation(
                "firebase.fcm_endpoint",
                "FCM endpoint must start with http:// or https://.",
            ));
        }

        if let Some(token_uri) = &self.token_uri
            && !is_http_url(token_uri)
        {
            return Err(ConfigError::validation(
                "firebase.token_uri",
                "Token URI must start with http:// or https://.",
            ));
        }

        Ok(())
    }
}

impl DeliveryLogConfig {
    /// Validate delivery log settings
    ///
    /// # Validation Rules
    /// - Collection must be a single non-empty path segment
    /// - Database id must not be empty
    /// - Endpoint must be an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        let collection = self.collection.trim();
        if collection.is_empty() || collection.contains('/') {
            return Err(ConfigError::validation(
                "delivery_log.collection",
                "Collection must be a non-empty name without '/'.",
            ));
        }

        if self.database.trim().is_empty() {
            return Err(ConfigError::validation(
                "delivery_log.database",
                "Database id must not be empty. Use (default) for the default database.",
            ));
        }

        if !is_http_url(&self.endpoint) {
            return Err(ConfigError::validation(
                "delivery_log.endpoint",
                "Firestore endpoint must start with http:// or https://.",
            ));
        }

        Ok(())
    }
}

impl ContentConfig {
    /// Validate replacement pools. An empty list keeps the built-in pool, but
    /// a configured pool must not contain blank entries.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.titles.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::validation(
                "content.titles",
                "Configured titles must not be blank.",
            ));
        }

        if self.bodies.iter().any(|b| b.trim().is_empty()) {
            return Err(ConfigError::validation(
                "content.bodies",
                "Configured bodies must not be blank.",
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    ///
    /// This method validates all sub-configurations and returns the first
    /// validation error encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logger.validate()?;
        self.firebase.validate()?;
        self.delivery_log.validate()?;
        self.content.validate()?;
        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}
