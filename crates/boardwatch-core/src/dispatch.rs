//! Spectator fan-out.
//!
//! Every attached spectator owns a bounded queue. Publishing a frame is a
//! non-blocking `try_send` to each queue: a spectator whose queue is full
//! or whose receiving side has gone away is detached on the spot, so a
//! slow or dead connection can never stall the producer or the other
//! spectators of the same game.
//!
//! A new spectator is handed a [`Subscription`] whose replay buffer holds
//! the game's history at the moment of attachment. [`Subscription::recv`]
//! drains the replay buffer before the live queue, which gives each
//! spectator a single ordered stream: history first, then live frames.

use std::collections::{BTreeMap, VecDeque};

use boardwatch_types::{Frame, GameId, SubscriberId};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tracing::debug;

/// Default number of frames that may queue for one spectator.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Why a frame could not be handed to a subscriber.
///
/// Never surfaced to the publisher; the subscriber is detached instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryFailed {
    /// The subscriber's queue is full; it is not keeping up.
    #[error("subscriber queue is full")]
    Backpressured,
    /// The receiving side of the subscriber has been dropped.
    #[error("subscriber disconnected")]
    Disconnected,
}

/// Outcome of one [`SubscriberSet::publish`] call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Subscribers the frame was queued for.
    pub delivered: usize,
    /// Subscribers detached because delivery failed.
    pub detached: Vec<SubscriberId>,
}

/// The live spectators of one game.
#[derive(Debug, Default)]
pub struct SubscriberSet {
    senders: BTreeMap<SubscriberId, mpsc::Sender<Frame>>,
}

impl SubscriberSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber's outbound queue.
    pub fn insert(&mut self, id: SubscriberId, sender: mpsc::Sender<Frame>) {
        self.senders.insert(id, sender);
    }

    /// Remove a subscriber. Returns whether it was present.
    pub fn remove(&mut self, id: SubscriberId) -> bool {
        self.senders.remove(&id).is_some()
    }

    /// Whether `id` is currently attached.
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.senders.contains_key(&id)
    }

    /// Number of attached subscribers.
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    /// Whether no subscriber is attached.
    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Queue `frame` for every subscriber, detaching those that fail.
    ///
    /// Per-subscriber order matches publish order because each queue is
    /// FIFO and publishes on one game are serialized by the game's lock.
    pub fn publish(&mut self, game_id: &GameId, frame: Frame) -> PublishReport {
        let mut report = PublishReport::default();
        self.senders.retain(|id, sender| match deliver(sender, frame) {
            Ok(()) => {
                report.delivered = report.delivered.saturating_add(1);
                true
            }
            Err(reason) => {
                debug!(%game_id, subscriber = %id, %reason, "Detaching subscriber");
                report.detached.push(*id);
                false
            }
        });
        report
    }
}

fn deliver(sender: &mpsc::Sender<Frame>, frame: Frame) -> Result<(), DeliveryFailed> {
    sender.try_send(frame).map_err(|err| match err {
        TrySendError::Full(_) => DeliveryFailed::Backpressured,
        TrySendError::Closed(_) => DeliveryFailed::Disconnected,
    })
}

/// One spectator's view of a game: replayed history, then live frames.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriberId,
    game_id: GameId,
    replay: VecDeque<Frame>,
    live: mpsc::Receiver<Frame>,
}

impl Subscription {
    pub(crate) const fn new(
        id: SubscriberId,
        game_id: GameId,
        replay: VecDeque<Frame>,
        live: mpsc::Receiver<Frame>,
    ) -> Self {
        Self {
            id,
            game_id,
            replay,
            live,
        }
    }

    /// The id under which this subscription is registered.
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// The game being watched.
    pub const fn game_id(&self) -> &GameId {
        &self.game_id
    }

    /// Replayed frames not yet consumed.
    pub fn pending_replay(&self) -> usize {
        self.replay.len()
    }

    /// Next frame for this spectator.
    ///
    /// Returns `None` once the subscriber has been detached and its queue
    /// drained. Cancel-safe: a frame is never lost if the future is
    /// dropped before completion.
    pub async fn recv(&mut self) -> Option<Frame> {
        if let Some(frame) = self.replay.pop_front() {
            return Some(frame);
        }
        self.live.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Result<Frame, TryRecvError> {
        if let Some(frame) = self.replay.pop_front() {
            return Ok(frame);
        }
        self.live.try_recv()
    }
}
