//! Operator input loop.
//!
//! The operator types a game id on one line and a move on the next, in
//! the canonical `{"piece":..,"from":..,"to":..,"color":..}` form. Each
//! decoded move is appended to the shared registry, which broadcasts it
//! to that game's spectators. A `quit` line or end of input stops the
//! loop.

use boardwatch_core::GameRegistry;
use boardwatch_types::{GameId, MoveRecord};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::error::ConsoleError;

/// Line that ends the session.
pub const QUIT_COMMAND: &str = "quit";

/// Counters for one console session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Moves appended to the registry.
    pub appended: usize,
    /// Input lines that were rejected.
    pub rejected: usize,
}

enum Prompt {
    GameId,
    Move(GameId),
}

impl Prompt {
    const fn text(&self) -> &'static str {
        match self {
            Self::GameId => "game id> ",
            Self::Move(_) => "move> ",
        }
    }
}

/// Run the input loop until `quit` or end of input.
///
/// Prompts are written to `output`. A move line that fails to decode is
/// logged and the loop goes back to asking for a game id.
pub async fn run<R, W>(
    input: R,
    mut output: W,
    registry: &GameRegistry,
) -> Result<SessionStats, ConsoleError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut stats = SessionStats::default();
    let mut prompt = Prompt::GameId;

    loop {
        output.write_all(prompt.text().as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            info!("Console input closed");
            break;
        };
        let line = line.trim();
        if line == QUIT_COMMAND {
            info!("Console quit requested");
            break;
        }

        prompt = match prompt {
            Prompt::GameId => {
                if line.is_empty() {
                    warn!("Empty game id, ignored");
                    stats.rejected = stats.rejected.saturating_add(1);
                    Prompt::GameId
                } else {
                    Prompt::Move(GameId::from(line))
                }
            }
            Prompt::Move(game_id) => {
                match serde_json::from_str::<MoveRecord>(line) {
                    Ok(record) => {
                        registry.append_move(&game_id, record).await;
                        stats.appended = stats.appended.saturating_add(1);
                    }
                    Err(e) => {
                        warn!(%game_id, error = %e, "Malformed move, ignored");
                        stats.rejected = stats.rejected.saturating_add(1);
                    }
                }
                Prompt::GameId
            }
        };
    }

    Ok(stats)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    async fn session(input: &str, registry: &GameRegistry) -> (SessionStats, String) {
        let mut output = Vec::new();
        let stats = run(input.as_bytes(), &mut output, registry).await.unwrap();
        (stats, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn appends_moves_in_order() {
        let registry = GameRegistry::new();
        let input = "g1\n\
            {\"piece\":\"pawn\",\"from\":\"e2\",\"to\":\"e4\",\"color\":true}\n\
            g1\n\
            {\"piece\":\"pawn\",\"from\":\"e7\",\"to\":\"e5\",\"color\":false}\n";

        let (stats, _) = session(input, &registry).await;

        assert_eq!(stats.appended, 2);
        let history = registry.history(&GameId::from("g1")).await;
        assert_eq!(history[0], MoveRecord::new("pawn", "e2", "e4", true));
        assert_eq!(history[1], MoveRecord::new("pawn", "e7", "e5", false));
    }

    #[tokio::test]
    async fn malformed_move_is_skipped() {
        let registry = GameRegistry::new();
        let input = "g1\n\
            {\"piece\":\"pawn\"}\n\
            g1\n\
            {\"piece\":\"rook\",\"from\":\"a1\",\"to\":\"a4\",\"color\":true}\n";

        let (stats, _) = session(input, &registry).await;

        assert_eq!(stats.appended, 1);
        assert_eq!(stats.rejected, 1);
        let history = registry.history(&GameId::from("g1")).await;
        assert_eq!(history, vec![MoveRecord::new("rook", "a1", "a4", true)]);
    }

    #[tokio::test]
    async fn quit_stops_before_remaining_input() {
        let registry = GameRegistry::new();
        let input = "g1\nquit\n\
            {\"piece\":\"pawn\",\"from\":\"e2\",\"to\":\"e4\",\"color\":true}\n";

        let (stats, _) = session(input, &registry).await;

        assert_eq!(stats, SessionStats::default());
        assert_eq!(registry.game_count().await, 0);
    }

    #[tokio::test]
    async fn empty_input_ends_cleanly() {
        let registry = GameRegistry::new();
        let (stats, output) = session("", &registry).await;

        assert_eq!(stats, SessionStats::default());
        assert_eq!(output, "game id> ");
    }

    #[tokio::test]
    async fn blank_game_id_is_rejected() {
        let registry = GameRegistry::new();
        let (stats, output) = session("\n  \ng2\n", &registry).await;

        assert_eq!(stats.rejected, 2);
        assert!(output.ends_with("move> "));
        assert_eq!(registry.game_count().await, 0);
    }
}
