use haggle_game::constants::LEADERBOARD_LIMIT;
use haggle_game::{ScoreEntry, merge_scores};

use crate::error::LeaderboardError;
use crate::store::ScoreStore;

/// Fetch and submit scores against a [`ScoreStore`].
///
/// `fetch_top` and `submit_score` never fail: any error is logged and
/// reported as an empty list, so "unreachable" and "empty" look the same.
/// Callers that need the difference use the `try_` forms.
pub struct Leaderboard<S> {
    store: S,
    limit: usize,
}

impl<S: ScoreStore> Leaderboard<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            limit: LEADERBOARD_LIMIT,
        }
    }

    /// Override how many entries are kept. Mostly useful in tests.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// The persisted list as stored, or empty on any failure.
    pub async fn fetch_top(&self) -> Vec<ScoreEntry> {
        self.try_fetch_top().await.unwrap_or_else(|error| {
            log::error!(
                "error fetching high scores from {}: {error}",
                self.store.name()
            );
            Vec::new()
        })
    }

    /// Merge a score and persist the result. Returns the new top list, or
    /// empty on any failure.
    pub async fn submit_score(&self, name: &str, score: i64) -> Vec<ScoreEntry> {
        self.try_submit_score(name, score)
            .await
            .unwrap_or_else(|error| {
                log::error!(
                    "error submitting high score to {}: {error}",
                    self.store.name()
                );
                Vec::new()
            })
    }

    /// # Errors
    ///
    /// Returns the store's error when the document cannot be read.
    pub async fn try_fetch_top(&self) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        self.store.load().await
    }

    /// Read, append, rank, truncate, overwrite.
    ///
    /// Not atomic: a concurrent submission from another session between the
    /// read and the write is lost.
    ///
    /// # Errors
    ///
    /// `EmptyName` for a blank name, otherwise the store's read or write error.
    pub async fn try_submit_score(
        &self,
        name: &str,
        score: i64,
    ) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let entry = ScoreEntry::new(name, score).ok_or(LeaderboardError::EmptyName)?;
        let current = self.store.load().await?;
        let top = merge_scores(current, entry, self.limit);
        self.store.replace(&top).await?;
        log::info!(
            "submitted score {score} for {}; {} entries on the board",
            name.trim(),
            top.len()
        );
        Ok(top)
    }
}
