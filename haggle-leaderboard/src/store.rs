use async_trait::async_trait;
use haggle_game::ScoreEntry;

use crate::error::LeaderboardError;

/// Backing storage for the leaderboard: one document holding the whole list.
///
/// There is no partial update. `replace` overwrites the document, so a
/// read-modify-write by two players at once can lose one of the writes.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    /// Read the full persisted list.
    async fn load(&self) -> Result<Vec<ScoreEntry>, LeaderboardError>;

    /// Overwrite the persisted list.
    async fn replace(&self, entries: &[ScoreEntry]) -> Result<(), LeaderboardError>;
}

#[async_trait]
impl<T: ScoreStore + ?Sized> ScoreStore for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn load(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        (**self).load().await
    }

    async fn replace(&self, entries: &[ScoreEntry]) -> Result<(), LeaderboardError> {
        (**self).replace(entries).await
    }
}
