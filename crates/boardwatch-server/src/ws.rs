//! `WebSocket` handler for spectators.
//!
//! Clients connect to `GET /watch?id=<game>`. The game must already exist
//! (started or with at least one move); otherwise the request is answered
//! with 404 and no upgrade happens. Once upgraded, the client receives the
//! game's full history as move frames, then every later move frame and
//! every `REVERT` frame, in order. Frames sent by the client are read only
//! to notice when it goes away.

use std::sync::Arc;

use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use boardwatch_types::GameId;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::handlers::GameQuery;
use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection watching one game.
///
/// # Route
///
/// `GET /watch?id=<game>`
pub async fn watch(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameQuery>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Result<Response, ApiError> {
    let game_id = query.game_id()?;

    if state.registry.find_game(&game_id).await.is_none() {
        return Err(ApiError::NotFound(format!("no game with id {game_id:?}")));
    }

    let ws = match upgrade {
        Ok(ws) => ws,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    Ok(ws.on_upgrade(move |socket| handle_ws(socket, state, game_id)))
}

/// Handle the `WebSocket` lifecycle: attach to the game, forward frames
/// until either side goes away, then detach.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>, game_id: GameId) {
    let mut subscription = match state.registry.attach_subscriber(&game_id).await {
        Ok(subscription) => subscription,
        Err(e) => {
            warn!(%game_id, error = %e, "Spectator could not attach");
            return;
        }
    };
    let subscriber = subscription.id();

    loop {
        tokio::select! {
            // Next replayed or live frame for this spectator.
            frame = subscription.recv() => {
                let Some(frame) = frame else {
                    debug!(%game_id, %subscriber, "Spectator dropped by dispatcher");
                    break;
                };
                let text = match frame.to_text() {
                    Ok(t) => t,
                    Err(e) => {
                        warn!("Failed to serialize frame: {e}");
                        continue;
                    }
                };
                if socket.send(Message::Text(text.into())).await.is_err() {
                    debug!(%game_id, %subscriber, "Spectator disconnected (send failed)");
                    break;
                }
            }
            // Client frames only matter for detecting close.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(%game_id, %subscriber, "Spectator disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(%game_id, %subscriber, "Spectator disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(%game_id, %subscriber, "WebSocket error: {e}");
                        break;
                    }
                    _ => {
                        // Text and binary frames from spectators are discarded.
                    }
                }
            }
        }
    }

    state
        .registry
        .detach_subscriber(subscription.game_id(), subscriber)
        .await;
}
