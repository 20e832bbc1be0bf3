//! Shared type definitions for Boardwatch.
//!
//! Producers submit [`MoveRecord`]s in their canonical named form;
//! spectators receive [`MoveFrame`]s with integer codes. The translation
//! between the two lives here so every crate encodes moves the same way.
//! Wire types export `TypeScript` bindings via `ts-rs` for browser clients.
//!
//! # Modules
//!
//! - [`ids`] -- [`GameId`] and [`SubscriberId`]
//! - [`enums`] -- [`Piece`] and its wire codes
//! - [`square`] -- [`Square`] coordinates and their 0..64 numbering
//! - [`moves`] -- [`MoveRecord`], the logged half-move
//! - [`frame`] -- [`MoveFrame`], [`Frame`] and the revert sentinel
//! - [`structs`] -- read models such as [`GameSummary`]
//! - [`error`] -- [`EncodeError`]

pub mod enums;
pub mod error;
pub mod frame;
pub mod ids;
pub mod moves;
pub mod square;
pub mod structs;

pub use enums::Piece;
pub use error::{EncodeError, SymbolKind};
pub use frame::{Frame, MoveFrame, REVERT_FRAME};
pub use ids::{GameId, SubscriberId};
pub use moves::MoveRecord;
pub use square::{SQUARE_COUNT, Square};
pub use structs::GameSummary;
