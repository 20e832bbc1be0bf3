//! Server startup helper for embedding in a producer binary.
//!
//! Provides [`spawn_server`] which launches the HTTP + `WebSocket` server
//! on a background Tokio task, so a binary can keep producing moves into
//! the same registry while spectators are served.
//!
//! # Usage
//!
//! ```rust,ignore
//! use boardwatch_server::{spawn_server, AppState, ServerConfig};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState::default());
//! let handle = spawn_server(ServerConfig::default(), state).await?;
//! // The server is now running. Abort the handle on shutdown.
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the Boardwatch HTTP server on a background Tokio task.
///
/// Returns a [`JoinHandle`] so the caller can manage the server's
/// lifecycle alongside its own loop. The address is validated before the
/// task is spawned; bind failures inside the task are logged.
pub async fn spawn_server(
    config: ServerConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<()>, StartupError> {
    // Catch obvious misconfigurations before going to the background.
    let addr = config.socket_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = crate::server::start_server(&config, state).await {
            tracing::error!(error = %e, "Boardwatch server exited with error");
        }
    });

    tracing::info!(%addr, "Boardwatch server spawned on background task");

    Ok(handle)
}
