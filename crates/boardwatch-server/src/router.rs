//! Axum router construction for the Boardwatch API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS enabled so browser boards on other origins can read it.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Boardwatch server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `POST /move?id=` -- append moves
/// - `GET /watch?id=` -- `WebSocket` spectator stream
/// - `POST /revert?id=` -- revert the last move
/// - `GET|POST /start?id=` -- start a game
/// - `POST /AI/add?id=` / `GET /AI/get?id=` -- analysis cache
/// - `GET /api/games` -- game summaries
/// - `GET /api/games/{id}/moves` -- move history
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // Producer API
        .route("/move", post(handlers::submit_moves))
        .route("/revert", post(handlers::revert_move))
        .route("/start", get(handlers::start_game).post(handlers::start_game))
        // Spectators
        .route("/watch", get(ws::watch))
        // Analysis cache
        .route("/AI/add", post(handlers::set_analysis))
        .route("/AI/get", get(handlers::get_analysis))
        // Read models
        .route("/api/games", get(handlers::list_games))
        .route("/api/games/{id}/moves", get(handlers::game_moves))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
