//! Outbound frames delivered to spectators.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Text payload of the revert frame.
///
/// It is not valid JSON, so clients can tell it apart from a move frame
/// without a type tag.
pub const REVERT_FRAME: &str = "REVERT";

/// Encoded form of one move: `{"piece":1,"from":52,"to":36,"color":true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MoveFrame {
    /// Piece code, 1 (pawn) through 6 (king).
    pub piece: u8,
    /// Origin square index, 0 (`a8`) through 63 (`h1`).
    pub from: u8,
    /// Destination square index.
    pub to: u8,
    /// Side flag, copied from the move record.
    pub color: bool,
}

/// A message pushed to every subscriber of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// A move was appended (or is being replayed).
    Move(MoveFrame),
    /// The most recent move was reverted.
    Revert,
}

impl Frame {
    /// Render the frame as the text sent over the socket.
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Move(frame) => serde_json::to_string(frame),
            Self::Revert => Ok(REVERT_FRAME.to_owned()),
        }
    }
}

impl From<MoveFrame> for Frame {
    fn from(frame: MoveFrame) -> Self {
        Self::Move(frame)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn move_frame_text_has_integer_fields() {
        let text = Frame::Move(MoveFrame {
            piece: 1,
            from: 52,
            to: 36,
            color: true,
        })
        .to_text()
        .unwrap();
        assert_eq!(text, r#"{"piece":1,"from":52,"to":36,"color":true}"#);
    }

    #[test]
    fn revert_frame_is_not_json() {
        let text = Frame::Revert.to_text().unwrap();
        assert_eq!(text, "REVERT");
        assert!(serde_json::from_str::<MoveFrame>(&text).is_err());
    }
}
