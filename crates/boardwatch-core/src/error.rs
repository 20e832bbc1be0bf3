//! Errors reported by registry operations.

use boardwatch_types::GameId;

/// Failure of a [`GameRegistry`](crate::registry::GameRegistry) operation.
///
/// Both variants are reported to the immediate caller and never affect
/// other games or the process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The operation requires an existing game and none was started.
    #[error("no game with id {game_id:?}")]
    NotFound {
        /// The id that was looked up.
        game_id: GameId,
    },

    /// A revert was requested on a game with no moves.
    #[error("game {game_id:?} has no moves to revert")]
    EmptyLog {
        /// The game whose log was empty.
        game_id: GameId,
    },
}
