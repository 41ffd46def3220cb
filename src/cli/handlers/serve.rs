//! Serve command handler
//!
//! Runs the HTTP server, or with `--dry-run` checks that it could start.

use crate::config::Settings;
use crate::error::AppResult;
use crate::server::Server;
use crate::state::AppState;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Start the server, or only validate when `dry_run` is set
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Credential bootstrap errors
    /// - Server startup errors (if not dry-run)
    pub async fn execute(self, dry_run: bool) -> AppResult<()> {
        if dry_run {
            return self.validate_only();
        }

        Server::new(self.config).run().await?;
        Ok(())
    }

    /// Validate configuration and credentials without binding a socket
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("✓ Dispatch mode: {}", self.config.dispatch.mode.as_str());

        let state = AppState::from_settings(&self.config)?;
        println!(
            "✓ Service account credentials are valid ({} provider ready)",
            state.dispatcher.provider_name()
        );

        if self
            .config
            .dispatch
            .default_token
            .as_deref()
            .is_none_or(str::is_empty)
        {
            println!("! No default recipient token configured");
        }

        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
