//! Configuration settings structures for pushnote
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "pushnote".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/pushnote.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_fcm_endpoint() -> String {
    "https://fcm.googleapis.com".to_string()
}

fn default_firestore_endpoint() -> String {
    "https://firestore.googleapis.com".to_string()
}

fn default_firestore_database() -> String {
    "(default)".to_string()
}

fn default_collection() -> String {
    "notifications".to_string()
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Application version
    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Serve the OpenAPI document and Swagger UI
    #[serde(default)]
    pub enable_docs: bool,

    /// Allow cross-origin requests from any origin
    #[serde(default)]
    pub cors: bool,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_docs: false,
            cors: false,
        }
    }
}

// ============================================================================
// Logger Settings
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Whether console output is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether to use colored output
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    /// Whether file output is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Path to the log file
    #[serde(default = "default_log_path")]
    pub path: String,

    /// Whether to append to existing file
    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console output settings
    #[serde(default)]
    pub console: ConsoleSettings,

    /// File output settings
    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert LoggerSettings to the runtime LoggerConfig
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let console_config = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file_config = self.file.into_file_config()?;

        LoggerConfig::new(console_config, file_config, self.level).map_err(|e| {
            ConfigError::ValidationError {
                field: "logger".to_string(),
                message: e.to_string(),
            }
        })
    }
}

impl FileSettings {
    /// Convert FileSettings to FileConfig
    pub fn into_file_config(self) -> Result<FileConfig, ConfigError> {
        let format = self
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::validation("logger.file.format".to_string(), e.to_string()))?;

        FileConfig::new(self.enabled, PathBuf::from(self.path), self.append, format).map_err(|e| {
            ConfigError::ValidationError {
                field: "logger.file".to_string(),
                message: e.to_string(),
            }
        })
    }
}

// ============================================================================
// Firebase Configuration
// ============================================================================

/// Firebase service account and endpoint configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseConfig {
    /// Base64-encoded service account JSON (`FIREBASE_CRED_JSON`)
    #[serde(default)]
    pub credentials: Option<String>,

    /// Path to a service account JSON key file
    #[serde(default)]
    pub credentials_file: Option<String>,

    /// FCM HTTP v1 base URL
    #[serde(default = "default_fcm_endpoint")]
    pub fcm_endpoint: String,

    /// Overrides the `token_uri` of the service account
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            credentials_file: None,
            fcm_endpoint: default_fcm_endpoint(),
            token_uri: None,
        }
    }
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("credentials", &self.credentials.as_ref().map(|_| "<redacted>"))
            .field("credentials_file", &self.credentials_file)
            .field("fcm_endpoint", &self.fcm_endpoint)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

// ============================================================================
// Dispatch Configuration
// ============================================================================

/// Which deployable variant of the dispatch flow this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Random content when omitted, no delivery log, `/send-random` routed
    #[default]
    Basic,
    /// Mandatory explicit content, every send logged before delivery
    Logged,
}

impl DispatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchMode::Basic => "basic",
            DispatchMode::Logged => "logged",
        }
    }
}

impl std::fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dispatch behaviour configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DispatchConfig {
    /// Deployable variant
    #[serde(default)]
    pub mode: DispatchMode,

    /// Fallback recipient token (`DEFAULT_FCM_TOKEN`)
    #[serde(default)]
    pub default_token: Option<String>,
}

// ============================================================================
// Delivery Log Configuration
// ============================================================================

/// Firestore delivery log configuration (logged mode only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryLogConfig {
    /// Collection that receives one document per send attempt
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Firestore database id
    #[serde(default = "default_firestore_database")]
    pub database: String,

    /// Firestore REST base URL
    #[serde(default = "default_firestore_endpoint")]
    pub endpoint: String,
}

impl Default for DeliveryLogConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            database: default_firestore_database(),
            endpoint: default_firestore_endpoint(),
        }
    }
}

// ============================================================================
// Content Configuration
// ============================================================================

/// Replacement message pools. Empty lists keep the built-in pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContentConfig {
    #[serde(default)]
    pub titles: Vec<String>,

    #[serde(default)]
    pub bodies: Vec<String>,
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application information
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerSettings,

    /// Firebase credentials and endpoints
    #[serde(default)]
    pub firebase: FirebaseConfig,

    /// Dispatch variant and default target
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Delivery log store
    #[serde(default)]
    pub delivery_log: DeliveryLogConfig,

    /// Message pools
    #[serde(default)]
    pub content: ContentConfig,
}
