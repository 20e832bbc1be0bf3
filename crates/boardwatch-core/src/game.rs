//! A single game: its move log and its spectators.

use std::collections::VecDeque;

use boardwatch_types::{Frame, GameId, GameSummary, MoveRecord, SubscriberId};
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::warn;

use crate::dispatch::{SubscriberSet, Subscription};

/// Ordered move history of one game.
///
/// Append-only except for [`pop`](Self::pop), which removes exactly the
/// most recent entry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GameLog {
    moves: Vec<MoveRecord>,
}

impl GameLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self { moves: Vec::new() }
    }

    /// Append a move at the end of the log.
    pub fn push(&mut self, record: MoveRecord) {
        self.moves.push(record);
    }

    /// Remove and return the most recent move.
    pub fn pop(&mut self) -> Option<MoveRecord> {
        self.moves.pop()
    }

    /// All moves in chronological order.
    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// Number of moves in the log.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether the log holds no moves.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// One game entry: the log plus the spectators watching it.
///
/// Always accessed through the registry's per-game lock, so the methods
/// here can treat log mutation and fan-out as one step.
#[derive(Debug)]
pub struct Game {
    id: GameId,
    log: GameLog,
    subscribers: SubscriberSet,
    created_at: DateTime<Utc>,
}

impl Game {
    /// Create an empty game.
    pub fn new(id: GameId) -> Self {
        Self {
            id,
            log: GameLog::new(),
            subscribers: SubscriberSet::new(),
            created_at: Utc::now(),
        }
    }

    /// The game id.
    pub const fn id(&self) -> &GameId {
        &self.id
    }

    /// The move log.
    pub const fn log(&self) -> &GameLog {
        &self.log
    }

    /// The attached spectators.
    pub const fn subscribers(&self) -> &SubscriberSet {
        &self.subscribers
    }

    /// When this entry was created.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Record `record` and push it to every spectator.
    ///
    /// The move is kept even if it cannot be encoded; only its broadcast is
    /// skipped. Returns the number of spectators it was queued for.
    pub fn append(&mut self, record: MoveRecord) -> usize {
        let encoded = record.encode();
        self.log.push(record);
        match encoded {
            Ok(frame) => self.subscribers.publish(&self.id, Frame::Move(frame)).delivered,
            Err(e) => {
                warn!(game_id = %self.id, error = %e, "Move recorded but not broadcast");
                0
            }
        }
    }

    /// Remove the most recent move and tell every spectator.
    ///
    /// Returns `None`, without broadcasting, if the log is empty.
    pub fn revert(&mut self) -> Option<MoveRecord> {
        let removed = self.log.pop()?;
        self.subscribers.publish(&self.id, Frame::Revert);
        Some(removed)
    }

    /// Register a new spectator and snapshot the history it must replay.
    ///
    /// Registration and snapshot happen under the same borrow, so every
    /// move is either in the replay or delivered live, exactly once.
    pub fn attach(&mut self, queue_capacity: usize) -> Subscription {
        let id = SubscriberId::new();
        let (sender, receiver) = mpsc::channel(queue_capacity.max(1));

        let replay: VecDeque<Frame> = self
            .log
            .moves()
            .iter()
            .filter_map(|record| match record.encode() {
                Ok(frame) => Some(Frame::Move(frame)),
                Err(e) => {
                    warn!(game_id = %self.id, error = %e, "Skipping unencodable move in replay");
                    None
                }
            })
            .collect();

        self.subscribers.insert(id, sender);
        Subscription::new(id, self.id.clone(), replay, receiver)
    }

    /// Remove a spectator. Idempotent.
    pub fn detach(&mut self, subscriber: SubscriberId) -> bool {
        self.subscribers.remove(subscriber)
    }

    /// Read-model summary of this game.
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id.clone(),
            moves: self.log.len(),
            subscribers: self.subscribers.len(),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boardwatch_types::MoveFrame;

    use super::*;

    fn e2e4() -> MoveRecord {
        MoveRecord::new("pawn", "e2", "e4", true)
    }

    fn e7e5() -> MoveRecord {
        MoveRecord::new("pawn", "e7", "e5", false)
    }

    #[test]
    fn append_preserves_call_order() {
        let mut game = Game::new(GameId::from("g"));
        game.append(e2e4());
        game.append(e7e5());
        assert_eq!(game.log().moves(), &[e2e4(), e7e5()]);
    }

    #[test]
    fn revert_removes_exactly_the_last_move() {
        let mut game = Game::new(GameId::from("g"));
        game.append(e2e4());
        game.append(e7e5());
        assert_eq!(game.revert(), Some(e7e5()));
        assert_eq!(game.log().moves(), &[e2e4()]);
    }

    #[test]
    fn revert_on_empty_log_does_not_broadcast() {
        let mut game = Game::new(GameId::from("g"));
        let mut sub = game.attach(4);
        assert_eq!(game.revert(), None);
        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn unencodable_move_is_logged_but_not_broadcast() {
        let mut game = Game::new(GameId::from("g"));
        let mut sub = game.attach(4);
        let bad = MoveRecord::new("wizard", "e2", "e4", true);
        assert_eq!(game.append(bad.clone()), 0);
        assert_eq!(game.log().moves(), &[bad]);
        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn attach_replays_history_then_live() {
        let mut game = Game::new(GameId::from("g"));
        game.append(e2e4());
        let mut sub = game.attach(4);
        game.append(e7e5());

        let first = sub.try_recv().unwrap();
        let second = sub.try_recv().unwrap();
        assert_eq!(
            first,
            Frame::Move(MoveFrame {
                piece: 1,
                from: 52,
                to: 36,
                color: true,
            })
        );
        assert_eq!(
            second,
            Frame::Move(MoveFrame {
                piece: 1,
                from: 12,
                to: 28,
                color: false,
            })
        );
    }

    #[test]
    fn detach_is_idempotent() {
        let mut game = Game::new(GameId::from("g"));
        let sub = game.attach(4);
        assert!(game.detach(sub.id()));
        assert!(!game.detach(sub.id()));
        assert!(game.subscribers().is_empty());
    }

    #[test]
    fn summary_counts_moves_and_spectators() {
        let mut game = Game::new(GameId::from("g"));
        let _sub = game.attach(4);
        game.append(e2e4());
        let summary = game.summary();
        assert_eq!(summary.id, GameId::from("g"));
        assert_eq!(summary.moves, 1);
        assert_eq!(summary.subscribers, 1);
    }
}
