//! Console producer binary for Boardwatch.
//!
//! Starts the HTTP + `WebSocket` server on a background task and then
//! reads moves from stdin, appending them to the same registry the
//! server's spectators watch.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `boardwatch.yaml` (optional)
//! 3. Create the game registry
//! 4. Spawn the HTTP server
//! 5. Run the console loop until `quit` or end of input
//! 6. Stop the server

mod console;
mod error;

use std::path::Path;
use std::sync::Arc;

use boardwatch_core::{BoardwatchConfig, GameRegistry};
use boardwatch_server::{AppState, ServerConfig};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::ConsoleError;

/// Application entry point for the console producer.
///
/// # Errors
///
/// Returns an error if configuration, server startup or console I/O fails.
#[tokio::main]
async fn main() -> Result<(), ConsoleError> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("boardwatch starting");

    // 2. Load configuration.
    let config = BoardwatchConfig::load_or_default(Path::new("boardwatch.yaml"))?;
    info!(
        host = config.server.host,
        port = config.server.port,
        queue_capacity = config.dispatch.subscriber_queue_capacity,
        "Configuration loaded"
    );

    // 3. Create the registry shared by the server and the console.
    let registry = Arc::new(GameRegistry::from_config(&config.dispatch));
    let state = Arc::new(AppState::new(Arc::clone(&registry)));

    // 4. Start the server.
    let server = boardwatch_server::spawn_server(ServerConfig::from(&config.server), state).await?;

    // 5. Read moves from the operator.
    let stdin = BufReader::new(tokio::io::stdin());
    let stats = console::run(stdin, tokio::io::stdout(), &registry).await?;

    // 6. Stop serving.
    server.abort();

    info!(
        appended = stats.appended,
        rejected = stats.rejected,
        games = registry.game_count().await,
        "boardwatch shutdown complete"
    );

    Ok(())
}
