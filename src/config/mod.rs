//! Configuration management module for pushnote
//!
//! This module provides layered configuration loading with support for:
//! - TOML configuration files
//! - Environment variable overrides
//! - Multiple environment configurations (development, test, staging, production)
//!
//! # Configuration Priority (lowest to highest)
//! 1. Built-in defaults
//! 2. `default.toml` - Base configuration
//! 3. `{environment}.toml` - Environment-specific configuration
//! 4. `local.toml` - Local overrides (not committed to version control)
//! 5. `PUSHNOTE_*` environment variables
//! 6. `FIREBASE_CRED_JSON`, `DEFAULT_FCM_TOKEN` and `PORT`

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ContentConfig, DeliveryLogConfig, DispatchConfig, DispatchMode, FirebaseConfig, Settings,
};
