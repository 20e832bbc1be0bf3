//! Enumeration types shared by producers and spectators.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::EncodeError;

/// Kind of chess piece that made a move.
///
/// Each variant has a stable wire code (see [`Piece::code`]) that spectator
/// clients rely on; the codes must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Piece {
    /// Pawn, wire code 1.
    Pawn,
    /// Rook, wire code 2.
    Rook,
    /// Knight, wire code 3.
    Knight,
    /// Bishop, wire code 4.
    Bishop,
    /// Queen, wire code 5.
    Queen,
    /// King, wire code 6.
    King,
}

impl Piece {
    /// Every piece kind, in wire-code order.
    pub const ALL: [Self; 6] = [
        Self::Pawn,
        Self::Rook,
        Self::Knight,
        Self::Bishop,
        Self::Queen,
        Self::King,
    ];

    /// Integer code used in broadcast frames.
    pub const fn code(self) -> u8 {
        match self {
            Self::Pawn => 1,
            Self::Rook => 2,
            Self::Knight => 3,
            Self::Bishop => 4,
            Self::Queen => 5,
            Self::King => 6,
        }
    }

    /// Canonical lowercase name, as accepted in move submissions.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

impl core::fmt::Display for Piece {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Piece {
    type Err = EncodeError;

    /// Names match case-insensitively, so `pawn`, `Pawn` and `PAWN` are
    /// all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|piece| piece.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| EncodeError::piece(s))
    }
}
