//! The game registry: the single store of all games and the concurrency
//! boundary for every mutation.
//!
//! # Locking
//!
//! The outer map is behind a [`RwLock`] that is only held long enough to
//! look up or insert a game handle. Each game then has its own [`Mutex`];
//! append, revert, attach, detach and the fan-out they trigger all run
//! inside that game's exclusive section. Operations on different games
//! never contend once their handles are resolved, and fan-out never
//! awaits, so the per-game section is always short.

use std::collections::BTreeMap;
use std::sync::Arc;

use boardwatch_types::{GameId, GameSummary, MoveRecord, SubscriberId};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::analysis::AnalysisCache;
use crate::config::DispatchConfig;
use crate::dispatch::{DEFAULT_QUEUE_CAPACITY, Subscription};
use crate::error::RegistryError;
use crate::game::Game;

/// Shared, lockable handle to one game.
pub type GameHandle = Arc<Mutex<Game>>;

/// Process-wide store of games and analysis blobs.
///
/// Constructed once at startup and shared as `Arc<GameRegistry>` with every
/// component that needs it.
#[derive(Debug)]
pub struct GameRegistry {
    games: RwLock<BTreeMap<GameId, GameHandle>>,
    analysis: AnalysisCache,
    queue_capacity: usize,
}

impl GameRegistry {
    /// Create an empty registry with the default spectator queue capacity.
    pub fn new() -> Self {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Create an empty registry whose spectators may each queue up to
    /// `capacity` frames before being detached as too slow.
    pub fn with_queue_capacity(capacity: usize) -> Self {
        Self {
            games: RwLock::new(BTreeMap::new()),
            analysis: AnalysisCache::new(),
            queue_capacity: capacity.max(1),
        }
    }

    /// Create an empty registry from the dispatch configuration.
    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::with_queue_capacity(config.subscriber_queue_capacity)
    }

    /// Return the game for `id`, creating an empty one if absent.
    pub async fn ensure_game(&self, id: &GameId) -> GameHandle {
        if let Some(game) = self.find_game(id).await {
            return game;
        }

        let mut games = self.games.write().await;
        let game = games.entry(id.clone()).or_insert_with(|| {
            info!(game_id = %id, "Game created");
            Arc::new(Mutex::new(Game::new(id.clone())))
        });
        Arc::clone(game)
    }

    /// Return the game for `id` without creating it.
    pub async fn find_game(&self, id: &GameId) -> Option<GameHandle> {
        self.games.read().await.get(id).map(Arc::clone)
    }

    /// Append one move and push it to the game's spectators.
    pub async fn append_move(&self, id: &GameId, record: MoveRecord) {
        let game = self.ensure_game(id).await;
        let delivered = game.lock().await.append(record);
        debug!(game_id = %id, delivered, "Move appended");
    }

    /// Append `records` in order.
    ///
    /// The whole batch is applied inside one exclusive section, so no other
    /// producer's move can land between two moves of the same batch.
    /// Returns the number of moves appended.
    pub async fn append_moves<I>(&self, id: &GameId, records: I) -> usize
    where
        I: IntoIterator<Item = MoveRecord>,
    {
        let game = self.ensure_game(id).await;
        let mut game = game.lock().await;
        let mut appended: usize = 0;
        for record in records {
            game.append(record);
            appended = appended.saturating_add(1);
        }
        debug!(game_id = %id, appended, "Move batch appended");
        appended
    }

    /// Remove the most recent move and broadcast the revert sentinel.
    ///
    /// Returns the removed move. Fails with [`RegistryError::NotFound`] if
    /// the game was never started and [`RegistryError::EmptyLog`] if it has
    /// no moves; neither case broadcasts anything.
    pub async fn revert_last(&self, id: &GameId) -> Result<MoveRecord, RegistryError> {
        let game = self
            .find_game(id)
            .await
            .ok_or_else(|| RegistryError::NotFound {
                game_id: id.clone(),
            })?;

        let removed = game
            .lock()
            .await
            .revert()
            .ok_or_else(|| RegistryError::EmptyLog {
                game_id: id.clone(),
            })?;

        info!(game_id = %id, "Last move reverted");
        Ok(removed)
    }

    /// Attach a new spectator to an existing game.
    ///
    /// The returned [`Subscription`] yields the full history in order and
    /// then every later frame. Fails with [`RegistryError::NotFound`] if
    /// the game was never started; spectators cannot create games.
    pub async fn attach_subscriber(&self, id: &GameId) -> Result<Subscription, RegistryError> {
        let game = self
            .find_game(id)
            .await
            .ok_or_else(|| RegistryError::NotFound {
                game_id: id.clone(),
            })?;

        let subscription = game.lock().await.attach(self.queue_capacity);
        info!(
            game_id = %id,
            subscriber = %subscription.id(),
            replay = subscription.pending_replay(),
            "Spectator attached"
        );
        Ok(subscription)
    }

    /// Detach a spectator. Idempotent and infallible.
    pub async fn detach_subscriber(&self, id: &GameId, subscriber: SubscriberId) {
        let Some(game) = self.find_game(id).await else {
            return;
        };
        if game.lock().await.detach(subscriber) {
            info!(game_id = %id, %subscriber, "Spectator detached");
        }
    }

    /// Current move history of a game, creating the game if absent.
    pub async fn history(&self, id: &GameId) -> Vec<MoveRecord> {
        let game = self.ensure_game(id).await;
        game.lock().await.log().moves().to_vec()
    }

    /// Move history of an existing game.
    ///
    /// Unlike [`history`](Self::history) this never creates the game;
    /// unknown ids fail with [`RegistryError::NotFound`].
    pub async fn recorded_moves(&self, id: &GameId) -> Result<Vec<MoveRecord>, RegistryError> {
        let game = self
            .find_game(id)
            .await
            .ok_or_else(|| RegistryError::NotFound {
                game_id: id.clone(),
            })?;
        let moves = game.lock().await.log().moves().to_vec();
        Ok(moves)
    }

    /// Number of spectators attached to a game (0 if it does not exist).
    pub async fn subscriber_count(&self, id: &GameId) -> usize {
        match self.find_game(id).await {
            Some(game) => game.lock().await.subscribers().len(),
            None => 0,
        }
    }

    /// Number of games in the registry.
    pub async fn game_count(&self) -> usize {
        self.games.read().await.len()
    }

    /// Summaries of every game, ordered by id.
    pub async fn summaries(&self) -> Vec<GameSummary> {
        // Snapshot the handles first so no game lock is awaited while the
        // map lock is held.
        let handles: Vec<GameHandle> = self.games.read().await.values().cloned().collect();

        let mut summaries = Vec::with_capacity(handles.len());
        for game in handles {
            summaries.push(game.lock().await.summary());
        }
        summaries
    }

    /// Analysis blob cached for `id`, if any.
    pub async fn get_analysis(&self, id: &GameId) -> Option<Vec<u8>> {
        self.analysis.get(id).await
    }

    /// Cache an analysis blob for `id`, replacing any previous one.
    pub async fn set_analysis(&self, id: GameId, blob: Vec<u8>) {
        debug!(game_id = %id, bytes = blob.len(), "Analysis stored");
        self.analysis.set(id, blob).await;
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::BTreeSet;

    use boardwatch_types::{Frame, MoveFrame, Piece, Square};

    use super::*;

    fn e2e4() -> MoveRecord {
        MoveRecord::new("pawn", "e2", "e4", true)
    }

    fn e7e5() -> MoveRecord {
        MoveRecord::new("pawn", "e7", "e5", false)
    }

    #[tokio::test]
    async fn ensure_game_creates_once() {
        let registry = GameRegistry::new();
        let id = GameId::from("g1");
        let a = registry.ensure_game(&id).await;
        let b = registry.ensure_game(&id).await;
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.game_count().await, 1);
        assert!(a.lock().await.log().is_empty());
    }

    #[tokio::test]
    async fn append_creates_game_and_keeps_order() {
        let registry = GameRegistry::new();
        let id = GameId::from("fresh");
        registry.append_move(&id, e2e4()).await;
        registry.append_move(&id, e7e5()).await;
        assert_eq!(registry.history(&id).await, vec![e2e4(), e7e5()]);
    }

    #[tokio::test]
    async fn append_moves_applies_in_array_order() {
        let registry = GameRegistry::new();
        let id = GameId::from("batch");
        let appended = registry.append_moves(&id, vec![e2e4(), e7e5()]).await;
        assert_eq!(appended, 2);
        assert_eq!(registry.history(&id).await, vec![e2e4(), e7e5()]);
    }

    #[tokio::test]
    async fn revert_on_missing_game_is_not_found() {
        let registry = GameRegistry::new();
        let id = GameId::from("ghost");
        let err = registry.revert_last(&id).await.unwrap_err();
        assert_eq!(err, RegistryError::NotFound { game_id: id.clone() });
        // Revert must not create the game as a side effect.
        assert!(registry.find_game(&id).await.is_none());
    }

    #[tokio::test]
    async fn revert_on_empty_log_leaves_state_unchanged() {
        let registry = GameRegistry::new();
        let id = GameId::from("empty");
        registry.ensure_game(&id).await;
        let err = registry.revert_last(&id).await.unwrap_err();
        assert_eq!(err, RegistryError::EmptyLog { game_id: id.clone() });
        assert!(registry.history(&id).await.is_empty());
    }

    #[tokio::test]
    async fn revert_drops_last_and_notifies_spectators() {
        let registry = GameRegistry::new();
        let id = GameId::from("g1");
        registry.append_moves(&id, vec![e2e4(), e7e5()]).await;
        let mut sub = registry.attach_subscriber(&id).await.unwrap();
        // Drain replay.
        sub.recv().await.unwrap();
        sub.recv().await.unwrap();

        let removed = registry.revert_last(&id).await.unwrap();
        assert_eq!(removed, e7e5());
        assert_eq!(registry.history(&id).await, vec![e2e4()]);
        assert_eq!(sub.recv().await, Some(Frame::Revert));
    }

    #[tokio::test]
    async fn attach_to_unknown_game_is_not_found() {
        let registry = GameRegistry::new();
        let id = GameId::from("nobody");
        assert!(matches!(
            registry.attach_subscriber(&id).await,
            Err(RegistryError::NotFound { .. })
        ));
        assert_eq!(registry.game_count().await, 0);
    }

    #[tokio::test]
    async fn late_spectator_gets_history_then_live_moves() {
        let registry = GameRegistry::new();
        let id = GameId::from("g1");
        registry.ensure_game(&id).await;
        registry.append_move(&id, e2e4()).await;
        registry.append_move(&id, e7e5()).await;

        let mut sub = registry.attach_subscriber(&id).await.unwrap();
        let knight = MoveRecord::from_parts(
            Piece::Knight,
            "g1".parse::<Square>().unwrap(),
            "f3".parse::<Square>().unwrap(),
            true,
        );
        registry.append_move(&id, knight).await;

        let expected = [
            MoveFrame {
                piece: 1,
                from: 52,
                to: 36,
                color: true,
            },
            MoveFrame {
                piece: 1,
                from: 12,
                to: 28,
                color: false,
            },
            MoveFrame {
                piece: 3,
                from: 62,
                to: 45,
                color: true,
            },
        ];
        for frame in expected {
            assert_eq!(sub.recv().await, Some(Frame::Move(frame)));
        }
    }

    #[tokio::test]
    async fn dropped_spectator_is_removed_on_next_publish() {
        let registry = GameRegistry::new();
        let id = GameId::from("g1");
        registry.ensure_game(&id).await;
        let gone = registry.attach_subscriber(&id).await.unwrap();
        let mut stays = registry.attach_subscriber(&id).await.unwrap();
        assert_eq!(registry.subscriber_count(&id).await, 2);

        drop(gone);
        registry.append_move(&id, e2e4()).await;

        assert_eq!(registry.subscriber_count(&id).await, 1);
        assert!(matches!(stays.recv().await, Some(Frame::Move(_))));
    }

    #[tokio::test]
    async fn slow_spectator_does_not_block_producer() {
        let registry = GameRegistry::with_queue_capacity(2);
        let id = GameId::from("g1");
        registry.ensure_game(&id).await;
        let _slow = registry.attach_subscriber(&id).await.unwrap();

        // Never read from `_slow`; appends must still complete promptly.
        let appends = async {
            for _ in 0..10 {
                registry.append_move(&id, e2e4()).await;
            }
        };
        tokio::time::timeout(std::time::Duration::from_secs(1), appends)
            .await
            .unwrap();

        assert_eq!(registry.subscriber_count(&id).await, 0);
        assert_eq!(registry.history(&id).await.len(), 10);
    }

    #[tokio::test]
    async fn detach_is_idempotent() {
        let registry = GameRegistry::new();
        let id = GameId::from("g1");
        registry.ensure_game(&id).await;
        let sub = registry.attach_subscriber(&id).await.unwrap();
        registry.detach_subscriber(&id, sub.id()).await;
        registry.detach_subscriber(&id, sub.id()).await;
        registry
            .detach_subscriber(&GameId::from("other"), sub.id())
            .await;
        assert_eq!(registry.subscriber_count(&id).await, 0);
    }

    #[tokio::test]
    async fn concurrent_appends_lose_nothing() {
        let registry = Arc::new(GameRegistry::new());
        let id = GameId::from("race");
        let squares: Vec<Square> = Square::all().collect();

        let tasks: Vec<_> = squares
            .iter()
            .map(|&to| {
                let registry = Arc::clone(&registry);
                let id = id.clone();
                let from = squares[0];
                tokio::spawn(async move {
                    registry
                        .append_move(&id, MoveRecord::from_parts(Piece::Queen, from, to, true))
                        .await;
                })
            })
            .collect();
        for result in futures::future::join_all(tasks).await {
            result.unwrap();
        }

        let history = registry.history(&id).await;
        assert_eq!(history.len(), squares.len());
        let distinct: BTreeSet<String> =
            history.iter().map(|m| m.destination().to_owned()).collect();
        assert_eq!(distinct.len(), squares.len());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn spectator_attaching_mid_stream_sees_every_move_once() {
        const TOTAL: u8 = 200;
        let registry = Arc::new(GameRegistry::new());
        let id = GameId::from("stream");

        // Move `i` goes from square `i / 64` to square `i % 64`, so every
        // move is distinguishable by its frame.
        let nth = |i: u8| {
            let from = Square::from_index(i / 64).unwrap();
            let to = Square::from_index(i % 64).unwrap();
            MoveRecord::from_parts(Piece::Rook, from, to, i % 2 == 0)
        };

        let producer = {
            let registry = Arc::clone(&registry);
            let id = id.clone();
            tokio::spawn(async move {
                for i in 0..TOTAL {
                    registry.append_move(&id, nth(i)).await;
                    if i % 8 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
            })
        };

        while registry.history(&id).await.len() < usize::from(TOTAL / 4) {
            tokio::task::yield_now().await;
        }
        let mut sub = registry.attach_subscriber(&id).await.unwrap();
        producer.await.unwrap();

        let mut seen = Vec::new();
        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while seen.len() < usize::from(TOTAL) {
                seen.push(sub.recv().await.unwrap());
            }
        })
        .await
        .unwrap();

        let expected: Vec<Frame> = (0..TOTAL)
            .map(|i| Frame::Move(nth(i).encode().unwrap()))
            .collect();
        assert_eq!(seen, expected);
        assert!(sub.try_recv().is_err());
    }

    #[tokio::test]
    async fn revert_after_unbroadcast_move_still_signals_spectators() {
        let registry = GameRegistry::new();
        let id = GameId::from("drift");
        registry.append_move(&id, e2e4()).await;
        let mut sub = registry.attach_subscriber(&id).await.unwrap();

        registry
            .append_move(&id, MoveRecord::new("wizard", "e7", "e5", false))
            .await;
        let removed = registry.revert_last(&id).await.unwrap();
        assert_eq!(removed.piece(), "wizard");

        // The spectator never saw the unencodable move but still gets the
        // revert, so its board drops e2e4 while the log keeps it.
        let replayed = e2e4().encode().unwrap();
        assert_eq!(sub.recv().await, Some(Frame::Move(replayed)));
        assert_eq!(sub.recv().await, Some(Frame::Revert));
        assert!(sub.try_recv().is_err());
        assert_eq!(registry.history(&id).await, vec![e2e4()]);
    }

    #[tokio::test]
    async fn recorded_moves_does_not_create_games() {
        let registry = GameRegistry::new();
        let id = GameId::from("never");
        assert!(matches!(
            registry.recorded_moves(&id).await,
            Err(RegistryError::NotFound { .. })
        ));
        assert!(registry.attach_subscriber(&id).await.is_err());

        registry.append_move(&id, e2e4()).await;
        assert_eq!(registry.recorded_moves(&id).await.unwrap(), vec![e2e4()]);
    }

    #[tokio::test]
    async fn summaries_are_sorted_by_id() {
        let registry = GameRegistry::new();
        registry.append_move(&GameId::from("b"), e2e4()).await;
        registry.ensure_game(&GameId::from("a")).await;
        let summaries = registry.summaries().await;
        let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(summaries[1].moves, 1);
    }

    #[tokio::test]
    async fn analysis_round_trip() {
        let registry = GameRegistry::new();
        let id = GameId::from("g1");
        assert_eq!(registry.get_analysis(&id).await, None);
        registry
            .set_analysis(id.clone(), b"best: Nf3".to_vec())
            .await;
        assert_eq!(
            registry.get_analysis(&id).await.as_deref(),
            Some(&b"best: Nf3"[..])
        );
        // The analysis cache is independent of the game map.
        assert_eq!(registry.game_count().await, 0);
    }
}
