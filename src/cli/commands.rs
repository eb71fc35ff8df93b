//! CLI command implementations
//!
//! `serve` builds exactly one store handle from validated configuration,
//! runs the HTTP server until Ctrl-C or SIGTERM, then closes the handle.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use super::args::Command;
use super::errors::{CliError, CliResult};
use crate::config::{AppConfig, StoreBackend};
use crate::http_server::{shutdown_signal, HttpServer};
use crate::store::{EntityStore, InMemoryStore, OnyxClient};

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    init_tracing();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            port,
            store,
        } => serve(config.as_deref(), port, store),
        Command::CheckConfig { config } => check_config(config.as_deref()),
    }
}

/// Install the global subscriber; `RUST_LOG` overrides the `info` default
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber installed earlier (tests, embedding) stays in place.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init();
}

/// Load configuration with command-line overrides applied, then validate
fn load_config(
    config_path: Option<&Path>,
    port: Option<u16>,
    store: Option<StoreBackend>,
) -> CliResult<AppConfig> {
    let mut config = match config_path {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    config.apply_env(|name| std::env::var(name).ok())?;

    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(store) = store {
        config.store = store;
    }

    config.validate()?;
    Ok(config)
}

/// Start the HTTP server
pub fn serve(
    config_path: Option<&Path>,
    port: Option<u16>,
    store: Option<StoreBackend>,
) -> CliResult<()> {
    let config = load_config(config_path, port, store)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        match config.store {
            StoreBackend::Onyx => {
                let client = OnyxClient::connect(&config.onyx)?;
                serve_with(Arc::new(client), &config, shutdown_signal()).await
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory store, records are lost on exit");
                serve_with(Arc::new(InMemoryStore::new()), &config, shutdown_signal()).await
            }
        }
    })
}

async fn serve_with<S, F>(store: Arc<S>, config: &AppConfig, shutdown: F) -> CliResult<()>
where
    S: EntityStore + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let default_partition = config.onyx.default_partition().map(str::to_string);
    let server = HttpServer::with_store(config.server.clone(), Arc::clone(&store), default_partition);

    let served = server.start(shutdown).await;

    // Close exactly once, whether or not the server exited cleanly.
    let closed = store.close().await;
    if let Err(e) = &closed {
        tracing::error!(error = %e, "failed to close store");
    }

    served?;
    closed?;
    tracing::info!("shutdown complete");
    Ok(())
}

/// Validate configuration and print it with secrets redacted
pub fn check_config(config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path, None, None)?;
    println!("{:#?}", config);
    println!("configuration OK");
    Ok(())
}
