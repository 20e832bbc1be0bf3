//! The move record submitted by producers and kept in a game's log.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Piece;
use crate::error::EncodeError;
use crate::frame::MoveFrame;
use crate::square::Square;

/// One half-move, in the canonical `{piece, from, to, color}` form.
///
/// Decoding is strict: unknown or missing fields are rejected, so a
/// partially populated record never exists. The piece and square names are
/// kept as submitted and only resolved when the move is encoded for
/// dispatch, which keeps the log independent of the wire encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "bindings/")]
pub struct MoveRecord {
    piece: String,
    from: String,
    to: String,
    color: bool,
}

impl MoveRecord {
    /// Build a record from raw symbol names.
    pub fn new(
        piece: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        color: bool,
    ) -> Self {
        Self {
            piece: piece.into(),
            from: from.into(),
            to: to.into(),
            color,
        }
    }

    /// Build a record from already-typed parts, using canonical names.
    pub fn from_parts(piece: Piece, from: Square, to: Square, color: bool) -> Self {
        Self {
            piece: piece.name().to_owned(),
            from: from.to_string(),
            to: to.to_string(),
            color,
        }
    }

    /// Piece name as submitted.
    pub fn piece(&self) -> &str {
        &self.piece
    }

    /// Origin square as submitted.
    pub fn origin(&self) -> &str {
        &self.from
    }

    /// Destination square as submitted.
    pub fn destination(&self) -> &str {
        &self.to
    }

    /// Side flag (`true` for white in the usual convention).
    pub const fn color(&self) -> bool {
        self.color
    }

    /// Translate the record into its broadcast frame.
    ///
    /// Fails with [`EncodeError::UnknownSymbol`] if the piece or either
    /// square is outside the fixed tables; no default code is substituted.
    pub fn encode(&self) -> Result<MoveFrame, EncodeError> {
        let piece: Piece = self.piece.parse()?;
        let from: Square = self.from.parse()?;
        let to: Square = self.to.parse()?;
        Ok(MoveFrame {
            piece: piece.code(),
            from: from.index(),
            to: to.index(),
            color: self.color,
        })
    }
}
