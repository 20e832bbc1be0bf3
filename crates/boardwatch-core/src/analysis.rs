//! Per-game cache of opaque analysis payloads.
//!
//! An engine or analysis tool posts its latest evaluation for a game and
//! viewers fetch it on demand. Entries are unrelated to the move log: no
//! history is kept and the last writer wins. Payloads are raw bytes and
//! are returned exactly as stored.

use std::collections::BTreeMap;

use boardwatch_types::GameId;
use tokio::sync::RwLock;

/// Last-writer-wins map from game id to analysis blob.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: RwLock<BTreeMap<GameId, Vec<u8>>>,
}

impl AnalysisCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the blob stored for `id`, or `None` if nothing was stored.
    pub async fn get(&self, id: &GameId) -> Option<Vec<u8>> {
        self.entries.read().await.get(id).cloned()
    }

    /// Store `blob` for `id`, replacing any previous value.
    pub async fn set(&self, id: GameId, blob: Vec<u8>) {
        self.entries.write().await.insert(id, blob);
    }

    /// Number of games with a cached blob.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether no blob has been stored yet.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
