//! HTTP server for the ezserve dev server.
//!
//! A single catch-all GET route over a site root: static files are
//! served verbatim, markdown sources render through the shared page
//! template. All shared state is computed once per server generation
//! and read-only afterwards; with reload-on-change enabled, a content
//! change gracefully restarts the generation.
//!
//! ```ignore
//! use std::path::PathBuf;
//! use ezserve_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         root: PathBuf::from("site"),
//!         ..ServerConfig::default()
//!     };
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod reload;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use ezserve_site::SiteContext;
use state::AppState;
use tokio::sync::mpsc;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Site root directory.
    pub root: PathBuf,
    /// Restart on site changes.
    pub reload: bool,
    /// Serve web components from a local dev server.
    pub local_components: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            root: PathBuf::from("."),
            reload: true,
            local_components: false,
        }
    }
}

/// Server startup error.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// Site configuration could not be loaded.
    #[error("{0}")]
    Config(#[from] ezserve_site::ConfigError),
    /// Listen address was malformed.
    #[error("invalid listen address: {0}")]
    Addr(#[from] std::net::AddrParseError),
    /// Bind or serve failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// File watcher failure.
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
}

/// How a server generation ended.
enum Exit {
    /// Ctrl-C: leave the run loop.
    Shutdown,
    /// Site changed: rebuild startup state and serve again.
    Restart,
}

/// Run the server until Ctrl-C.
///
/// With reload enabled, each detected site change ends the current
/// generation gracefully and the loop rebuilds the [`SiteContext`]
/// before serving again.
///
/// # Errors
///
/// Returns an error if startup state cannot be built or the listener
/// cannot bind.
pub async fn run_server(config: ServerConfig) -> Result<(), ServeError> {
    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;

    loop {
        let site = SiteContext::load(&config.root, config.local_components)?;
        let state = Arc::new(AppState { site });
        let router = app::create_router(state);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(address = %addr, root = %config.root.display(), "starting server");

        // The watcher must outlive the serve call for events to flow.
        let (_watcher, reload_rx) = if config.reload {
            let (watcher, rx) = reload::watch(&config.root)?;
            (Some(watcher), Some(rx))
        } else {
            (None, None)
        };

        match serve_generation(listener, router, reload_rx).await? {
            Exit::Shutdown => return Ok(()),
            Exit::Restart => {
                tracing::info!("site changed, reloading");
            }
        }
    }
}

/// Serve one generation until Ctrl-C or a site change.
async fn serve_generation(
    listener: tokio::net::TcpListener,
    router: axum::Router,
    reload_rx: Option<mpsc::Receiver<notify::Event>>,
) -> Result<Exit, ServeError> {
    let (exit_tx, exit_rx) = tokio::sync::oneshot::channel::<Exit>();

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let exit = match reload_rx {
                Some(mut rx) => tokio::select! {
                    () = shutdown_signal() => Exit::Shutdown,
                    _ = rx.recv() => Exit::Restart,
                },
                None => {
                    shutdown_signal().await;
                    Exit::Shutdown
                }
            };
            let _ = exit_tx.send(exit);
        })
        .await?;

    Ok(exit_rx.await.unwrap_or(Exit::Shutdown))
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received, stopping server...");
}
