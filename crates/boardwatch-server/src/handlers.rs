//! REST endpoint handlers for the Boardwatch server.
//!
//! Producers use the write endpoints; spectators use `/watch` (see
//! [`crate::ws`]) and the read endpoints. All handlers go through the
//! shared [`GameRegistry`](boardwatch_core::GameRegistry).
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `POST` | `/move?id=` | Append one move or an array of moves |
//! | `POST` | `/revert?id=` | Remove the most recent move |
//! | `GET`, `POST` | `/start?id=` | Create an empty game (idempotent) |
//! | `POST` | `/AI/add?id=` | Store an analysis blob |
//! | `GET` | `/AI/get?id=` | Fetch the analysis blob |
//! | `GET` | `/api/games` | Summaries of every game |
//! | `GET` | `/api/games/{id}/moves` | Move history of one game (404 if unknown) |

use std::fmt::Write as _;
use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use boardwatch_types::{GameId, MoveRecord};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

/// Body returned by `GET /AI/get` when no analysis is cached for the game.
pub const ANALYSIS_PLACEHOLDER: &str = "no analysis for this game id";

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// The `?id=<game>` query parameter shared by most endpoints.
#[derive(Debug, serde::Deserialize)]
pub struct GameQuery {
    /// The game id.
    pub id: Option<String>,
}

impl GameQuery {
    /// The game id, or [`ApiError::MissingGameId`] if absent or empty.
    pub fn game_id(&self) -> Result<GameId, ApiError> {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => Ok(GameId::from(id)),
            _ => Err(ApiError::MissingGameId),
        }
    }
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page listing games and the API.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let summaries = state.registry.summaries().await;
    let spectators: usize = summaries.iter().map(|s| s.subscribers).sum();

    let mut rows = String::new();
    for summary in &summaries {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(summary.id.as_str()),
            summary.moves,
            summary.subscribers,
        );
    }
    let game_count = summaries.len();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Boardwatch</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; }}
        td, th {{ padding: 0.3rem 1rem; text-align: left; }}
        .value {{ color: #58a6ff; font-weight: bold; }}
        code {{ color: #7ee787; }}
    </style>
</head>
<body>
    <h1>Boardwatch</h1>
    <p>Games: <span class="value">{game_count}</span> &middot; Spectators: <span class="value">{spectators}</span></p>
    <table>
        <tr><th>Game</th><th>Moves</th><th>Spectators</th></tr>
        {rows}
    </table>
    <h2>API</h2>
    <ul>
        <li><code>POST /move?id=</code> -- append a move or an array of moves</li>
        <li><code>POST /revert?id=</code> -- revert the last move</li>
        <li><code>POST /start?id=</code> -- start an empty game</li>
        <li><code>GET /watch?id=</code> -- WebSocket: history, then live moves</li>
        <li><code>POST /AI/add?id=</code>, <code>GET /AI/get?id=</code> -- analysis blob</li>
        <li><a href="/api/games">/api/games</a> -- game summaries</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// POST /move -- append moves
// ---------------------------------------------------------------------------

/// Append the moves in the body to a game, creating it if needed.
///
/// The body is either a single move object or an array of them; arrays
/// are applied in order. Every element must decode before any is applied.
pub async fn submit_moves(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let game_id = query.game_id()?;
    let moves = decode_moves(&body)?;

    let appended = state.registry.append_moves(&game_id, moves).await;

    Ok(Json(serde_json::json!({
        "ok": true,
        "game_id": game_id,
        "appended": appended,
    })))
}

/// Decode a move submission: one object or an array of objects.
pub fn decode_moves(body: &[u8]) -> Result<Vec<MoveRecord>, ApiError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidBody(format!("malformed JSON: {e}")))?;

    let moves = if value.is_array() {
        serde_json::from_value::<Vec<MoveRecord>>(value)
    } else {
        serde_json::from_value::<MoveRecord>(value).map(|record| vec![record])
    };

    moves.map_err(|e| ApiError::InvalidBody(format!("invalid move: {e}")))
}

// ---------------------------------------------------------------------------
// POST /revert -- undo the last move
// ---------------------------------------------------------------------------

/// Remove the most recent move of a game and notify its spectators.
pub async fn revert_move(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let game_id = query.game_id()?;
    let reverted = state.registry.revert_last(&game_id).await?;

    Ok(Json(serde_json::json!({
        "ok": true,
        "game_id": game_id,
        "reverted": reverted,
    })))
}

// ---------------------------------------------------------------------------
// /start -- create a game
// ---------------------------------------------------------------------------

/// Create an empty game. Starting an existing game changes nothing.
pub async fn start_game(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let game_id = query.game_id()?;
    let game = state.registry.ensure_game(&game_id).await;
    let moves = game.lock().await.log().len();
    info!(%game_id, moves, "Game start requested");

    Ok(Json(serde_json::json!({
        "ok": true,
        "game_id": game_id,
        "moves": moves,
    })))
}

// ---------------------------------------------------------------------------
// /AI -- analysis cache
// ---------------------------------------------------------------------------

/// Store the request body as the game's analysis blob.
///
/// The body is opaque: any bytes are accepted, UTF-8 or not.
pub async fn set_analysis(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let game_id = query.game_id()?;
    state.registry.set_analysis(game_id.clone(), body.to_vec()).await;

    Ok(Json(serde_json::json!({
        "ok": true,
        "game_id": game_id,
    })))
}

/// Return the game's analysis blob, or [`ANALYSIS_PLACEHOLDER`].
///
/// The stored bytes are returned unchanged. Readable cross-origin so browser boards hosted elsewhere can poll it.
pub async fn get_analysis(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let game_id = query.game_id()?;
    let blob = state
        .registry
        .get_analysis(&game_id)
        .await
        .unwrap_or_else(|| ANALYSIS_PLACEHOLDER.as_bytes().to_vec());

    let content_type = if std::str::from_utf8(&blob).is_ok() {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    };

    Ok((
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::CONTENT_TYPE, content_type),
        ],
        blob,
    ))
}

// ---------------------------------------------------------------------------
// /api/games -- read models
// ---------------------------------------------------------------------------

/// List every game with its move and spectator counts.
pub async fn list_games(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let games = state.registry.summaries().await;

    Json(serde_json::json!({
        "count": games.len(),
        "games": games,
    }))
}

/// Return the full move history of one game, or 404 if it was never
/// started.
pub async fn game_moves(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let game_id = GameId::from(id);
    let moves = state.registry.recorded_moves(&game_id).await?;

    Ok(Json(serde_json::json!({
        "game_id": game_id,
        "count": moves.len(),
        "moves": moves,
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn decode_single_object() {
        let moves = decode_moves(br#"{"piece":"pawn","from":"e2","to":"e4","color":true}"#).unwrap();
        assert_eq!(moves, vec![MoveRecord::new("pawn", "e2", "e4", true)]);
    }

    #[test]
    fn decode_array_keeps_order() {
        let body = br#"[
            {"piece":"pawn","from":"e2","to":"e4","color":true},
            {"piece":"pawn","from":"e7","to":"e5","color":false}
        ]"#;
        let moves = decode_moves(body).unwrap();
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[1].origin(), "e7");
    }

    #[test]
    fn decode_rejects_partial_record() {
        let err = decode_moves(br#"[{"piece":"pawn","from":"e2"}]"#).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody(_)));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode_moves(b"not json"),
            Err(ApiError::InvalidBody(_))
        ));
    }

    #[test]
    fn empty_id_is_missing() {
        let query = GameQuery {
            id: Some(String::new()),
        };
        assert!(matches!(query.game_id(), Err(ApiError::MissingGameId)));
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(escape_html("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#39;");
    }
}
