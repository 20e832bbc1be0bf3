//! HTTP + `WebSocket` server for Boardwatch.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **Producer endpoints** to start games, append moves and revert the
//!   last move
//! - **`WebSocket` endpoint** (`/watch?id=`) that replays a game's history
//!   and then streams every later move to the spectator
//! - **Analysis endpoints** (`/AI/add`, `/AI/get`) for the per-game
//!   analysis cache
//! - **Read endpoints** (`/api/games`) and a minimal HTML status page
//!
//! # Architecture
//!
//! All handlers share one [`GameRegistry`](boardwatch_core::GameRegistry)
//! through [`AppState`]. Request decoding and error mapping live here;
//! ordering, locking and fan-out are the registry's job.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{StartupError, spawn_server};
pub use state::AppState;
