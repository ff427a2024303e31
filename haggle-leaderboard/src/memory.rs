//! In-process store for offline play and tests.
use std::sync::Arc;

use async_trait::async_trait;
use haggle_game::ScoreEntry;
use tokio::sync::RwLock;

use crate::error::LeaderboardError;
use crate::store::ScoreStore;

/// Clones share the same document.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<Vec<ScoreEntry>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entries(entries: Vec<ScoreEntry>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Current document contents.
    pub async fn snapshot(&self) -> Vec<ScoreEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl ScoreStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn load(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        Ok(self.snapshot().await)
    }

    async fn replace(&self, entries: &[ScoreEntry]) -> Result<(), LeaderboardError> {
        *self.entries.write().await = entries.to_vec();
        Ok(())
    }
}
