//! Board coordinates.
//!
//! Squares are numbered 0..64 row-major starting from the far rank:
//! `a8` is 0, `h8` is 7, `a1` is 56 and `h1` is 63. This numbering is
//! what spectators receive in the `from` / `to` fields of a move frame.

use core::str::FromStr;

use crate::error::EncodeError;

/// Number of squares on the board.
pub const SQUARE_COUNT: u8 = 64;

/// Number of files (and ranks) on the board.
const BOARD_WIDTH: u8 = 8;

/// One of the 64 squares of an 8x8 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    /// Build a square from its wire index, or `None` if out of range.
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < SQUARE_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Wire index of the square (0 = `a8`, 63 = `h1`).
    pub const fn index(self) -> u8 {
        self.0
    }

    /// File, 0 for `a` through 7 for `h`.
    pub const fn file(self) -> u8 {
        self.0 % BOARD_WIDTH
    }

    /// Rank number as written in coordinates, 1 through 8.
    pub const fn rank(self) -> u8 {
        BOARD_WIDTH.wrapping_sub(self.0 / BOARD_WIDTH)
    }

    /// Iterate over all 64 squares in wire-index order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SQUARE_COUNT).map(Self)
    }
}

impl core::fmt::Display for Square {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let file = char::from(b'a'.wrapping_add(self.file()));
        let rank = char::from(b'0'.wrapping_add(self.rank()));
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Square {
    type Err = EncodeError;

    /// Parse a two-character coordinate such as `e4`; the file letter is
    /// case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [file, rank] = s.as_bytes() else {
            return Err(EncodeError::square(s));
        };

        let file = match file.to_ascii_lowercase() {
            f @ b'a'..=b'h' => f.wrapping_sub(b'a'),
            _ => return Err(EncodeError::square(s)),
        };
        let row = match *rank {
            r @ b'1'..=b'8' => b'8'.wrapping_sub(r),
            _ => return Err(EncodeError::square(s)),
        };

        Ok(Self(row.wrapping_mul(BOARD_WIDTH).wrapping_add(file)))
    }
}
