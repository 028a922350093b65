//! `ezserve serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use ezserve_server::{ServerConfig, run_server};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Site root directory (default: current directory).
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Host to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Reload on site changes (default: enabled).
    #[arg(long)]
    reload: Option<bool>,

    /// Disable reload on site changes.
    #[arg(long, conflicts_with = "reload")]
    no_reload: bool,

    /// Serve web components from a local dev server.
    #[arg(long)]
    local_components: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if the site root is unusable or the server
    /// fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir()?,
        };
        let reload = self.resolve_reload();

        output.info(&format!(
            "Starting server on {}:{}",
            self.host, self.port
        ));
        output.info(&format!("Site root: {}", root.display()));
        output.info(if reload {
            "Reload on change: enabled"
        } else {
            "Reload on change: disabled"
        });
        if self.local_components {
            output.info("Components: local dev server");
        }

        let config = ServerConfig {
            host: self.host,
            port: self.port,
            root,
            reload,
            local_components: self.local_components,
        };
        run_server(config).await?;

        Ok(())
    }

    /// Resolve the reload flag from --reload/--no-reload.
    fn resolve_reload(&self) -> bool {
        if self.no_reload {
            false
        } else {
            self.reload.unwrap_or(true)
        }
    }
}
