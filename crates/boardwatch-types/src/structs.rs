//! Read-model structs served over the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::GameId;

/// Summary of one game in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameSummary {
    /// The game id.
    pub id: GameId,
    /// Number of moves currently in the log.
    pub moves: usize,
    /// Number of spectators currently attached.
    pub subscribers: usize,
    /// When the game entry was first created.
    pub created_at: DateTime<Utc>,
}
