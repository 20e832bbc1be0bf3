//! Shared application state for the Boardwatch server.

use std::sync::Arc;

use boardwatch_core::GameRegistry;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The
/// registry is the same instance the console producer appends to, so
/// moves typed at the console reach HTTP spectators and vice versa.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The game registry shared with every producer.
    pub registry: Arc<GameRegistry>,
}

impl AppState {
    /// Create application state around an existing registry.
    pub const fn new(registry: Arc<GameRegistry>) -> Self {
        Self { registry }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(GameRegistry::new()))
    }
}
